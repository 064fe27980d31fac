use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rcst_core::SyntaxArena;
use rcst_parser::{parse, ParserOptions};

// A medium-size Rust source touching most of the grammar.
const RUST_SOURCE: &str = r#"
//! A small inventory service.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq)]
pub struct Item<'a> {
    pub id: u32,
    name: &'a str,
    tags: Vec<String>,
    price: Option<f64>,
}

#[derive(Debug)]
pub enum Event {
    Added { id: u32 },
    Removed(u32),
    Cleared,
}

pub trait Store: Send + Sync {
    type Key: Copy + Eq;

    fn get(&self, key: Self::Key) -> Option<&Item<'static>>;
    fn put(&mut self, item: Item<'static>) -> Result<(), String>;
}

impl<'a> Display for Item<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

pub struct Inventory {
    items: HashMap<u32, Item<'static>>,
    log: Vec<Event>,
}

impl Inventory {
    pub fn new() -> Self {
        Self { items: HashMap::new(), log: Vec::new() }
    }

    pub fn total(&self) -> f64 {
        self.items.values().filter_map(|item| item.price).sum::<f64>()
    }

    pub fn by_tag(&self) -> BTreeMap<&str, Vec<u32>> {
        let mut out: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for item in self.items.values() {
            for tag in &item.tags {
                out.entry(tag.as_str()).or_default().push(item.id);
            }
        }
        out
    }

    pub fn remove(&mut self, id: u32) -> Option<Item<'static>> {
        let removed = self.items.remove(&id)?;
        self.log.push(Event::Removed(id));
        Some(removed)
    }

    pub fn describe(&self, id: u32) -> String {
        match self.items.get(&id) {
            Some(Item { price: Some(p), .. }) if *p > 100.0 => format!("expensive #{id}"),
            Some(item) => item.to_string(),
            None => String::from("missing"),
        }
    }
}

impl Store for Inventory {
    type Key = u32;

    fn get(&self, key: u32) -> Option<&Item<'static>> {
        self.items.get(&key)
    }

    fn put(&mut self, item: Item<'static>) -> Result<(), String> {
        if let Some(existing) = self.items.get(&item.id) && existing.name != item.name {
            return Err(format!("id {} is taken", item.id));
        }
        self.log.push(Event::Added { id: item.id });
        self.items.insert(item.id, item);
        Ok(())
    }
}

macro_rules! items {
    ($($id:expr => $name:literal),* $(,)?) => {
        vec![$(Item { id: $id, name: $name, tags: vec![], price: None }),*]
    };
}

fn checksum(data: &[u8]) -> u32 {
    let mut hash = 0x811c_9dc5u32;
    'outer: for (i, &byte) in data.iter().enumerate() {
        if i > 1 << 20 {
            break 'outer;
        }
        hash = (hash ^ byte as u32).wrapping_mul(0x0100_0193);
    }
    hash
}
"#;

/// Repeat the medium source into a larger file.
fn generate_large_source(copies: usize) -> String {
    let mut out = String::with_capacity(RUST_SOURCE.len() * copies);
    for i in 0..copies {
        out.push_str(&format!("mod copy_{i} {{\n"));
        out.push_str(RUST_SOURCE);
        out.push_str("}\n");
    }
    out
}

fn bench_parse_medium(c: &mut Criterion) {
    let options = ParserOptions::default();
    c.bench_function("parse_rust_medium", |b| {
        b.iter(|| {
            let arena = SyntaxArena::new();
            let tree = parse(&arena, "bench.rs", black_box(RUST_SOURCE), &options);
            black_box(tree.root().node_count());
        });
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let options = ParserOptions::default();
    let source = generate_large_source(50);
    let mut group = c.benchmark_group("parse_rust_large");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("50_modules", |b| {
        b.iter(|| {
            let arena = SyntaxArena::new();
            let tree = parse(&arena, "large.rs", black_box(&source), &options);
            black_box(tree.root().node_count());
        });
    });
    group.finish();
}

fn bench_parse_with_errors(c: &mut Criterion) {
    let options = ParserOptions::default();
    let broken = RUST_SOURCE.replace(';', "").replace("=>", "");
    c.bench_function("parse_rust_recovery", |b| {
        b.iter(|| {
            let arena = SyntaxArena::new();
            let tree = parse(&arena, "broken.rs", black_box(&broken), &options);
            black_box(tree.diagnostics().len());
        });
    });
}

criterion_group!(benches, bench_parse_medium, bench_parse_large, bench_parse_with_errors);
criterion_main!(benches);
