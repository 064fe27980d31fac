//! Field names that label children of CST nodes.

/// A field label attached to a child of a node.
///
/// A node may carry several children with the same field (for example the
/// `pattern` of each alternative collected by a `match_arm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    Alias,
    Alternative,
    Argument,
    Arguments,
    Body,
    Bounds,
    Condition,
    Consequence,
    DefaultType,
    Element,
    Field,
    Function,
    Left,
    Length,
    List,
    Macro,
    Name,
    Operator,
    Parameters,
    Path,
    Pattern,
    ReturnType,
    Right,
    Trait,
    Type,
    TypeArguments,
    TypeParameters,
    Value,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Alias => "alias",
            FieldName::Alternative => "alternative",
            FieldName::Argument => "argument",
            FieldName::Arguments => "arguments",
            FieldName::Body => "body",
            FieldName::Bounds => "bounds",
            FieldName::Condition => "condition",
            FieldName::Consequence => "consequence",
            FieldName::DefaultType => "default_type",
            FieldName::Element => "element",
            FieldName::Field => "field",
            FieldName::Function => "function",
            FieldName::Left => "left",
            FieldName::Length => "length",
            FieldName::List => "list",
            FieldName::Macro => "macro",
            FieldName::Name => "name",
            FieldName::Operator => "operator",
            FieldName::Parameters => "parameters",
            FieldName::Path => "path",
            FieldName::Pattern => "pattern",
            FieldName::ReturnType => "return_type",
            FieldName::Right => "right",
            FieldName::Trait => "trait",
            FieldName::Type => "type",
            FieldName::TypeArguments => "type_arguments",
            FieldName::TypeParameters => "type_parameters",
            FieldName::Value => "value",
        }
    }

    /// Look a field up by its tree name.
    pub fn from_name(name: &str) -> Option<FieldName> {
        Self::ALL.iter().copied().find(|field| field.as_str() == name)
    }

    pub const ALL: &'static [FieldName] = &[
        FieldName::Alias,
        FieldName::Alternative,
        FieldName::Argument,
        FieldName::Arguments,
        FieldName::Body,
        FieldName::Bounds,
        FieldName::Condition,
        FieldName::Consequence,
        FieldName::DefaultType,
        FieldName::Element,
        FieldName::Field,
        FieldName::Function,
        FieldName::Left,
        FieldName::Length,
        FieldName::List,
        FieldName::Macro,
        FieldName::Name,
        FieldName::Operator,
        FieldName::Parameters,
        FieldName::Path,
        FieldName::Pattern,
        FieldName::ReturnType,
        FieldName::Right,
        FieldName::Trait,
        FieldName::Type,
        FieldName::TypeArguments,
        FieldName::TypeParameters,
        FieldName::Value,
    ];
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(FieldName::from_name("return_type"), Some(FieldName::ReturnType));
        assert_eq!(FieldName::from_name("nope"), None);
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_name(field.as_str()), Some(*field));
        }
    }
}
