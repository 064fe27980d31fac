//! The grammar engine.
//!
//! A recursive descent parser over the context-sensitive scanner. Each
//! production owns a `NodeBuilder`; tokens are bumped into it together with
//! the comments that precede them, so every byte of the input ends up under
//! exactly one node. The grammar itself is split across `items`, `types`,
//! `patterns`, `expressions` and `macros`; this module holds token
//! management, error recovery and the bounded speculation used by the
//! conflict table.

use log::{debug, trace};
use rcst_core::text::TextRange;
use rcst_core::SyntaxArena;
use rcst_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use rcst_scanner::{ScanSet, Scanner, ScannerState, Token};
use rcst_syntax::{Child, FieldName, NodeBuilder, NodeFlags, SyntaxKind, SyntaxNode, SyntaxTree};
use rustc_hash::FxHashMap;

use crate::conflicts::ConflictId;
use crate::options::ParserOptions;

bitflags::bitflags! {
    /// Positional restrictions on the expression grammar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct Restrictions: u8 {
        const NONE = 0;
        /// `if x {}`: a path followed by `{` is not a struct literal.
        const NO_STRUCT_LITERAL = 1 << 0;
        /// `let` is accepted as an operand (conditions of `if`/`while`).
        const ALLOW_LET = 1 << 1;
    }
}

/// Everything a speculative parse may change.
struct Snapshot {
    scanner: ScannerState,
    diagnostics: usize,
    unclosed_braces: u32,
    prev_end: u32,
}

/// The parser produces a `SyntaxTree` from Rust source text.
pub struct Parser<'a> {
    pub(crate) arena: &'a SyntaxArena,
    pub(crate) source: &'a str,
    pub(crate) scanner: Scanner<'a>,
    file_name: String,
    pub(crate) options: ParserOptions,
    diagnostics: DiagnosticCollection,
    depth: u32,
    pub(crate) restrictions: Restrictions,
    /// `{` tokens swallowed by error recovery whose `}` has not been seen.
    pub(crate) unclosed_braces: u32,
    /// End of the last consumed token or attached comment; missing nodes are
    /// placed here.
    pub(crate) prev_end: u32,
    /// Outcome of speculative parses: (token start, conflict) -> succeeded.
    memo: FxHashMap<(u32, ConflictId), bool>,
}

impl<'a> Parser<'a> {
    /// Create a parser. The source text is copied into the arena so the tree
    /// can borrow it for as long as the arena lives.
    pub fn new(
        arena: &'a SyntaxArena,
        file_name: &str,
        source_text: &str,
        options: &ParserOptions,
    ) -> Self {
        let source: &'a str = arena.alloc_str(source_text);
        Self {
            arena,
            source,
            scanner: Scanner::new(source),
            file_name: file_name.to_string(),
            options: options.clone(),
            diagnostics: DiagnosticCollection::new(),
            depth: 0,
            restrictions: Restrictions::NONE,
            unclosed_braces: 0,
            prev_end: 0,
            memo: FxHashMap::default(),
        }
    }

    /// Parse the whole input into a tree rooted at a `source_file` node.
    pub fn parse_source_file(mut self) -> SyntaxTree<'a> {
        debug!("parsing {} ({} bytes)", self.file_name, self.source.len());
        let mut root = NodeBuilder::new(SyntaxKind::SourceFile);
        self.scanner.scan(ScanSet::DEFAULT);
        if self.at(SyntaxKind::Shebang) {
            self.bump(&mut root);
        }
        self.parse_statements(&mut root, None, false);
        self.flush_trivia(&mut root);

        let range = TextRange::from_usize(0, self.source.len());
        let root = root.finish_with_range(self.arena, range);
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_position();
        let tree = SyntaxTree::new(root, self.source, self.file_name, diagnostics.into_vec());
        debug!(
            "parsed {}: {} nodes, {} arena bytes, had_errors={}",
            tree.file_name(),
            root.node_count(),
            self.arena.allocated_bytes(),
            tree.had_errors()
        );
        tree
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn current(&self) -> SyntaxKind {
        self.scanner.kind()
    }

    #[inline]
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    #[inline]
    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    #[inline]
    pub(crate) fn token_start(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    pub(crate) fn token_text(&self) -> &'a str {
        self.scanner.token_text()
    }

    /// Whether the current token is the identifier `text`. Used for
    /// contextual keywords, which scan as identifiers.
    pub(crate) fn at_contextual(&self, text: &str) -> bool {
        self.at(SyntaxKind::Identifier) && self.token_text() == text
    }

    /// The kind of the token `n` positions ahead (0 is the current token).
    pub(crate) fn nth(&mut self, n: usize) -> SyntaxKind {
        if n == 0 {
            return self.current();
        }
        self.scanner.look_ahead(|s| {
            for _ in 0..n {
                s.scan(ScanSet::DEFAULT);
            }
            s.kind()
        })
    }

    /// The text of the token `n` positions ahead.
    pub(crate) fn nth_text(&mut self, n: usize) -> &'a str {
        self.scanner.look_ahead(|s| {
            for _ in 0..n {
                s.scan(ScanSet::DEFAULT);
            }
            s.token_text()
        })
    }

    /// Consume the current token into `b`.
    #[inline]
    pub(crate) fn bump(&mut self, b: &mut NodeBuilder<'a>) {
        self.bump_with(b, None, None, ScanSet::DEFAULT);
    }

    #[inline]
    pub(crate) fn bump_field(&mut self, b: &mut NodeBuilder<'a>, field: FieldName) {
        self.bump_with(b, Some(field), None, ScanSet::DEFAULT);
    }

    /// Consume the current token under a different kind, e.g. a keyword
    /// used as a lifetime name or a contextual keyword.
    #[inline]
    pub(crate) fn bump_as(&mut self, b: &mut NodeBuilder<'a>, kind: SyntaxKind) {
        self.bump_with(b, None, Some(kind), ScanSet::DEFAULT);
    }

    #[inline]
    pub(crate) fn bump_as_field(&mut self, b: &mut NodeBuilder<'a>, field: FieldName, kind: SyntaxKind) {
        self.bump_with(b, Some(field), Some(kind), ScanSet::DEFAULT);
    }

    /// Consume the current token and scan the next one with `next`.
    pub(crate) fn bump_with(
        &mut self,
        b: &mut NodeBuilder<'a>,
        field: Option<FieldName>,
        remap: Option<SyntaxKind>,
        next: ScanSet,
    ) {
        if let Some(node) = self.take_token(b, remap, next) {
            b.push_child(Child { field, node });
        }
    }

    /// Consume the current token into a standalone node. Comments before it
    /// go to `b`.
    pub(crate) fn take_token(
        &mut self,
        b: &mut NodeBuilder<'a>,
        remap: Option<SyntaxKind>,
        next: ScanSet,
    ) -> Option<&'a SyntaxNode<'a>> {
        if self.at(SyntaxKind::EndOfFile) {
            return None;
        }
        self.attach_trivia(b);
        let token = self.scanner.take_token();
        self.report_lexical_errors(&token);
        let node = self.token_node(&token, remap);
        self.prev_end = token.range.end;
        self.scanner.scan(next);
        Some(node)
    }

    /// Consume `kind` if present, otherwise report it and insert a missing
    /// leaf. Returns whether the token was present.
    pub(crate) fn expect(&mut self, b: &mut NodeBuilder<'a>, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump(b);
            return true;
        }
        self.error_here(&messages::_0_EXPECTED, &[kind.name()]);
        b.push(self.missing(kind));
        false
    }

    /// Consume an identifier as `kind` under `field`, or insert a missing one.
    pub(crate) fn expect_name(&mut self, b: &mut NodeBuilder<'a>, field: FieldName, kind: SyntaxKind) {
        if self.at(SyntaxKind::Identifier) || self.at(SyntaxKind::Metavariable) {
            let remap = if self.at(SyntaxKind::Identifier) { kind } else { SyntaxKind::Metavariable };
            self.bump_as_field(b, field, remap);
        } else {
            self.error_expected(kind.name());
            b.push_field(field, self.missing(kind));
        }
    }

    /// Consume the current token as a standalone leaf. Comments before it
    /// go to `parent`.
    pub(crate) fn leaf(&mut self, parent: &mut NodeBuilder<'a>, remap: Option<SyntaxKind>) -> &'a SyntaxNode<'a> {
        match self.take_token(parent, remap, ScanSet::DEFAULT) {
            Some(node) => node,
            None => self.missing(remap.unwrap_or(SyntaxKind::Identifier)),
        }
    }

    /// Consume a number into the literal node `b`: the bare token, or the
    /// pieces of a number that has them.
    pub(crate) fn bump_number(&mut self, b: &mut NodeBuilder<'a>, next: ScanSet) {
        let Some(number) = self.take_token(b, None, next) else {
            return;
        };
        if number.is_leaf() {
            b.push(number);
        } else {
            b.add_flags(number.flags() & NodeFlags::ERROR);
            b.extend(number.children().iter().copied());
        }
    }

    #[inline]
    pub(crate) fn finish(&self, b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        b.finish(self.arena, self.prev_end)
    }

    /// A zero-width leaf standing in for an expected token.
    pub(crate) fn missing(&self, kind: SyntaxKind) -> &'a SyntaxNode<'a> {
        self.arena.alloc(SyntaxNode::leaf(
            kind,
            TextRange::empty(self.prev_end),
            NodeFlags::MISSING,
        ))
    }

    /// Allocate a copy of `node` with another kind.
    pub(crate) fn retag(&self, node: &'a SyntaxNode<'a>, kind: SyntaxKind) -> &'a SyntaxNode<'a> {
        if node.kind() == kind {
            return node;
        }
        self.arena.alloc(node.with_kind(kind))
    }

    /// Build the node for a scanned token. Literal tokens become a node whose
    /// children are the token's pieces. So do numbers with a radix prefix,
    /// a decimal point or an exponent, unless remapped.
    fn token_node(&self, token: &Token, remap: Option<SyntaxKind>) -> &'a SyntaxNode<'a> {
        let flags = if token.errors.is_empty() {
            NodeFlags::NONE
        } else {
            NodeFlags::ERROR
        };
        let composite = match token.kind {
            SyntaxKind::StringToken => Some(SyntaxKind::StringLiteral),
            SyntaxKind::RawStringToken => Some(SyntaxKind::RawStringLiteral),
            SyntaxKind::CharToken => Some(SyntaxKind::CharLiteral),
            SyntaxKind::IntegerToken if remap.is_none() && !token.pieces.is_empty() => {
                Some(SyntaxKind::IntegerLiteral)
            }
            SyntaxKind::FloatToken if remap.is_none() => Some(SyntaxKind::FloatLiteral),
            _ => None,
        };
        match composite {
            Some(kind) => {
                let mut b = NodeBuilder::new(kind);
                b.add_flags(flags);
                for piece in &token.pieces {
                    b.push(self.arena.alloc(SyntaxNode::leaf(piece.kind, piece.range, NodeFlags::NONE)));
                }
                b.finish_with_range(self.arena, token.range)
            }
            None => self.arena.alloc(SyntaxNode::leaf(
                remap.unwrap_or(token.kind),
                token.range,
                flags,
            )),
        }
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Move the comments before the current token into `b`.
    pub(crate) fn flush_trivia(&mut self, b: &mut NodeBuilder<'a>) {
        self.attach_trivia(b);
    }

    fn attach_trivia(&mut self, b: &mut NodeBuilder<'a>) {
        if self.scanner.leading_trivia().is_empty() {
            return;
        }
        let trivia = self.scanner.take_leading_trivia();
        if let Some(last) = trivia.last() {
            self.prev_end = last.range.end;
        }
        if !self.options.keep_comments {
            return;
        }
        for comment in &trivia {
            let node = if comment.pieces.is_empty() {
                self.arena.alloc(SyntaxNode::leaf(comment.kind, comment.range, NodeFlags::EXTRA))
            } else {
                let mut c = NodeBuilder::new(comment.kind);
                c.add_flags(NodeFlags::EXTRA);
                for piece in &comment.pieces {
                    c.push(self.arena.alloc(SyntaxNode::leaf(piece.kind, piece.range, NodeFlags::NONE)));
                }
                c.finish_with_range(self.arena, comment.range)
            };
            b.push(node);
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub(crate) fn error_at(&mut self, range: TextRange, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics
            .add(Diagnostic::located(&self.file_name, range, message, args));
    }

    pub(crate) fn error_here(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let range = self.scanner.token().range;
        self.error_at(range, message, args);
    }

    /// Report that `what` was expected where the current token is.
    pub(crate) fn error_expected(&mut self, what: &str) {
        if !self.scanner.token().errors.is_empty() {
            return;
        }
        let found = if self.at(SyntaxKind::EndOfFile) {
            "end of file"
        } else {
            self.token_text()
        };
        self.error_here(&messages::EXPECTED_0_FOUND_1, &[what, found]);
    }

    pub(crate) fn error_unexpected(&mut self) {
        // The scanner already explained what is wrong with this token.
        if !self.scanner.token().errors.is_empty() {
            return;
        }
        let text = self.token_text();
        self.error_here(&messages::UNEXPECTED_TOKEN_0, &[text]);
    }

    fn report_lexical_errors(&mut self, token: &Token) {
        for error in &token.errors {
            let diagnostic = error.to_diagnostic(&self.file_name, self.source);
            self.diagnostics.add(diagnostic);
        }
    }

    // ========================================================================
    // Nesting limit
    // ========================================================================

    /// Run `f` one nesting level deeper. Past the configured limit the
    /// construct at the current token is wrapped in an error node instead.
    pub(crate) fn guarded(
        &mut self,
        f: impl FnOnce(&mut Self) -> &'a SyntaxNode<'a>,
    ) -> &'a SyntaxNode<'a> {
        self.depth += 1;
        let node = if self.depth > self.options.max_depth {
            let limit = self.options.max_depth.to_string();
            self.error_here(&messages::NESTING_LIMIT_OF_0_EXCEEDED, &[&limit]);
            trace!("nesting limit reached at {}", self.token_start());
            self.skip_group_as_error()
        } else {
            f(self)
        };
        self.depth -= 1;
        node
    }

    /// Wrap the current token, or the whole delimited group it opens, in an
    /// error node. Closing delimiters and end of file are left alone.
    pub(crate) fn skip_group_as_error(&mut self) -> &'a SyntaxNode<'a> {
        let mut junk = NodeBuilder::new(SyntaxKind::Error);
        if self.current().is_close_delimiter() || self.at(SyntaxKind::EndOfFile) {
            return junk.finish(self.arena, self.prev_end);
        }
        let mut nesting = 0u32;
        loop {
            let kind = self.current();
            if kind == SyntaxKind::EndOfFile {
                break;
            }
            if kind.is_open_delimiter() {
                nesting += 1;
            } else if kind.is_close_delimiter() {
                nesting = nesting.saturating_sub(1);
            }
            self.bump(&mut junk);
            if nesting == 0 {
                break;
            }
        }
        junk.finish(self.arena, self.prev_end)
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            scanner: self.scanner.save_state(),
            diagnostics: self.diagnostics.len(),
            unclosed_braces: self.unclosed_braces,
            prev_end: self.prev_end,
        }
    }

    fn rewind(&mut self, snapshot: Snapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.diagnostics.truncate(snapshot.diagnostics);
        self.unclosed_braces = snapshot.unclosed_braces;
        self.prev_end = snapshot.prev_end;
    }

    /// Try the preferred reading of a declared conflict. If `f` declines or
    /// reports any diagnostic, everything it consumed is rolled back and
    /// `None` is returned so the caller can take the next candidate.
    pub(crate) fn speculate<T>(
        &mut self,
        conflict: ConflictId,
        f: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        let key = (self.token_start(), conflict);
        if self.memo.get(&key) == Some(&false) {
            return None;
        }
        let snapshot = self.snapshot();
        let diagnostics = snapshot.diagnostics;
        match f(self) {
            Some(value) if self.diagnostics.len() == diagnostics => {
                trace!("{:?} at {}: first candidate", conflict, key.0);
                self.memo.insert(key, true);
                Some(value)
            }
            _ => {
                trace!("{:?} at {}: falling back", conflict, key.0);
                self.rewind(snapshot);
                self.memo.insert(key, false);
                None
            }
        }
    }

    /// Record the outcome of a conflict decided without speculation.
    pub(crate) fn resolved(&self, conflict: ConflictId, chosen: SyntaxKind) -> SyntaxKind {
        debug_assert!(conflict.decl().candidates.contains(&chosen));
        trace!(
            "{:?} at {} resolved as {} ({:?})",
            conflict,
            self.token_start(),
            chosen.name(),
            conflict.resolution()
        );
        chosen
    }

    /// Run `f` with `restrictions` in place of the current ones.
    pub(crate) fn with_restrictions<T>(
        &mut self,
        restrictions: Restrictions,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = std::mem::replace(&mut self.restrictions, restrictions);
        let result = f(self);
        self.restrictions = saved;
        result
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Absorb a `}` that closes a `{` swallowed by earlier recovery.
    pub(crate) fn absorb_unclosed_brace(&mut self, b: &mut NodeBuilder<'a>) -> bool {
        if self.unclosed_braces > 0 && self.at(SyntaxKind::CloseBrace) {
            self.unclosed_braces -= 1;
            trace!("absorbing recovered '}}' at {}", self.token_start());
            self.bump(b);
            return true;
        }
        false
    }

    /// Statement-level recovery: wrap everything up to the next `;`
    /// (included), `}` (excluded) or end of input in an error node.
    pub(crate) fn recover_statement(&mut self, parent: &mut NodeBuilder<'a>) {
        self.recover_until(parent, SyntaxKind::Semicolon);
    }

    /// Wrap everything up to `terminator` (included), `}` (excluded) or end
    /// of input in an error node.
    pub(crate) fn recover_until(&mut self, parent: &mut NodeBuilder<'a>, terminator: SyntaxKind) {
        trace!("recovery to {:?} at {}", terminator, self.token_start());
        self.error_unexpected();
        self.flush_trivia(parent);
        let mut junk = NodeBuilder::new(SyntaxKind::Error);
        loop {
            let kind = self.current();
            if kind == SyntaxKind::EndOfFile || kind == SyntaxKind::CloseBrace {
                break;
            }
            if kind == SyntaxKind::OpenBrace {
                self.unclosed_braces += 1;
            }
            self.bump(&mut junk);
            if kind == terminator {
                break;
            }
        }
        parent.push(self.finish(junk));
    }

    /// Parse a delimited, comma-separated list into `list`.
    ///
    /// Unexpected tokens are wrapped in error nodes until the closer, a
    /// token in `sync` or the start of another element. If the list never
    /// closes, `list` itself becomes an error node with no fields and the
    /// function returns false.
    pub(crate) fn parse_list(
        &mut self,
        list: &mut NodeBuilder<'a>,
        open: SyntaxKind,
        close: SyntaxKind,
        sync: &[SyntaxKind],
        mut is_start: impl FnMut(&mut Self) -> bool,
        mut element: impl FnMut(&mut Self, &mut NodeBuilder<'a>),
    ) -> bool {
        if !self.at(open) {
            self.error_here(&messages::_0_EXPECTED, &[open.name()]);
            list.push(self.missing(open));
            list.push(self.missing(close));
            return true;
        }
        let open_range = self.scanner.token().range;
        self.bump(list);
        loop {
            self.flush_trivia(list);
            let kind = self.current();
            if kind == close {
                self.bump(list);
                return true;
            }
            if kind == SyntaxKind::EndOfFile || sync.contains(&kind) {
                break;
            }
            if is_start(self) {
                let before = self.token_start();
                element(self, list);
                if self.at(SyntaxKind::Comma) {
                    self.bump(list);
                    continue;
                }
                if self.at(close) {
                    continue;
                }
                if self.token_start() != before && is_start(self) {
                    self.error_here(&messages::_0_EXPECTED, &[","]);
                    list.push(self.missing(SyntaxKind::Comma));
                    continue;
                }
                if self.token_start() != before {
                    continue;
                }
            }
            if let Some(stray) = self.recover_in_list(close, sync, &mut is_start) {
                match stray {
                    Stray::Wrapped(node) => list.push(node),
                    Stray::Unclosed(children) => {
                        list.extend(children);
                        break;
                    }
                }
            }
        }
        trace!("unclosed {:?} list at {}", open, open_range.pos);
        self.error_at(open_range, &messages::UNCLOSED_DELIMITER_0, &[open.name()]);
        list.set_kind(SyntaxKind::Error);
        list.clear_fields();
        false
    }

    fn recover_in_list(
        &mut self,
        close: SyntaxKind,
        sync: &[SyntaxKind],
        is_start: &mut impl FnMut(&mut Self) -> bool,
    ) -> Option<Stray<'a>> {
        trace!("list recovery at {}", self.token_start());
        self.error_unexpected();
        let mut junk = NodeBuilder::new(SyntaxKind::Error);
        loop {
            let kind = self.current();
            if kind == close || kind == SyntaxKind::EndOfFile || sync.contains(&kind) {
                break;
            }
            if !junk.is_empty() && is_start(self) {
                break;
            }
            if kind == SyntaxKind::OpenBrace {
                self.unclosed_braces += 1;
            }
            self.bump(&mut junk);
        }
        if junk.is_empty() {
            return None;
        }
        if self.at(close) || is_start(self) {
            Some(Stray::Wrapped(junk.finish(self.arena, self.prev_end)))
        } else {
            Some(Stray::Unclosed(junk.split_off(0)))
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse statements into `parent` until `close` (not consumed) or end of
    /// input. With `items_only`, anything that does not start an item is
    /// recovered as an error.
    pub(crate) fn parse_statements(
        &mut self,
        parent: &mut NodeBuilder<'a>,
        close: Option<SyntaxKind>,
        items_only: bool,
    ) {
        loop {
            self.flush_trivia(parent);
            match self.current() {
                SyntaxKind::EndOfFile => break,
                SyntaxKind::CloseBrace => {
                    if self.absorb_unclosed_brace(parent) {
                        continue;
                    }
                    if close == Some(SyntaxKind::CloseBrace) {
                        break;
                    }
                    self.error_unexpected();
                    let mut junk = NodeBuilder::new(SyntaxKind::Error);
                    self.bump(&mut junk);
                    parent.push(junk.finish(self.arena, self.prev_end));
                }
                _ => {
                    let before = self.token_start();
                    if items_only {
                        if self.at_macro_invocation() && !self.at_item_start() {
                            self.parse_expression_statement(parent);
                        } else if !self.parse_item(parent) {
                            self.recover_statement(parent);
                        }
                    } else {
                        self.parse_statement(parent);
                    }
                    if self.token_start() == before && !self.at(SyntaxKind::EndOfFile) {
                        self.recover_statement(parent);
                    }
                }
            }
        }
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Paths
    // ========================================================================

    /// Whether the current token can name a path segment.
    pub(crate) fn at_path_segment(&self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::Identifier
                | SyntaxKind::SelfKw
                | SyntaxKind::SelfTypeKw
                | SyntaxKind::SuperKw
                | SyntaxKind::CrateKw
                | SyntaxKind::Metavariable
        )
    }

    /// Consume one path segment. Identifiers and `Self` become `kind`; the
    /// path keywords and metavariables keep their own kind.
    pub(crate) fn path_segment(&mut self, sink: &mut NodeBuilder<'a>, kind: SyntaxKind) -> &'a SyntaxNode<'a> {
        let remap = match self.current() {
            SyntaxKind::Identifier | SyntaxKind::SelfTypeKw => Some(kind),
            SyntaxKind::SelfKw | SyntaxKind::SuperKw | SyntaxKind::CrateKw | SyntaxKind::Metavariable => None,
            _ => {
                self.error_expected(kind.name());
                return self.missing(kind);
            }
        };
        self.leaf(sink, remap)
    }

    /// A path without generic arguments: `a`, `a::b`, `::a::b`.
    ///
    /// Stops before a `::` that is not followed by another segment, so
    /// `a::{b}` and `a::*` leave the `::` to the caller.
    pub(crate) fn parse_simple_path(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut path = if self.at(SyntaxKind::ColonColon) {
            let mut b = NodeBuilder::new(SyntaxKind::ScopedIdentifier);
            self.bump(&mut b);
            let name = self.path_segment(&mut b, SyntaxKind::Identifier);
            b.push_field(FieldName::Name, name);
            self.finish(b)
        } else {
            self.path_segment(parent, SyntaxKind::Identifier)
        };
        while self.at(SyntaxKind::ColonColon) && self.next_is_path_segment() {
            let mut b = NodeBuilder::new(SyntaxKind::ScopedIdentifier);
            b.push_field(FieldName::Path, path);
            self.bump(&mut b);
            let name = self.path_segment(&mut b, SyntaxKind::Identifier);
            b.push_field(FieldName::Name, name);
            path = self.finish(b);
        }
        path
    }

    pub(crate) fn next_is_path_segment(&mut self) -> bool {
        matches!(
            self.nth(1),
            SyntaxKind::Identifier
                | SyntaxKind::SelfKw
                | SyntaxKind::SelfTypeKw
                | SyntaxKind::SuperKw
                | SyntaxKind::CrateKw
                | SyntaxKind::Metavariable
        )
    }
}

/// Tokens swallowed by list recovery.
enum Stray<'a> {
    /// The list continues after an error node.
    Wrapped(&'a SyntaxNode<'a>),
    /// The list never closes; the tokens join the list directly.
    Unclosed(Vec<Child<'a>>),
}

/// Parse `text` with the given options.
pub fn parse<'a>(
    arena: &'a SyntaxArena,
    file_name: &str,
    text: &str,
    options: &ParserOptions,
) -> SyntaxTree<'a> {
    Parser::new(arena, file_name, text, options).parse_source_file()
}
