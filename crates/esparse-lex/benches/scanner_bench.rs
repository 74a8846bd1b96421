//! Scanner throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esparse_lex::{Scanner, TokenKind};

const FIXTURE: &str = r#"
// A small but representative slab of code.
var count = 0x10 + 0b101 + 3.14e2;
function accumulate(items) {
    'use strict';
    let total = 0;
    for (var i = 0; i < items.length; i++) {
        total += items[i];
    }
    return `total: ${total}`;
}
var matcher = /[a-z]+/gi;
var greeting = "hello world";
"#;

fn scan_fixture(source: &str) -> usize {
    let mut scanner = Scanner::new(source, false);
    let mut count = 0;
    loop {
        scanner.scan_comments().expect("comments scan");
        // The `/` here follows `=` so the regex goal applies.
        let token = if scanner.source()[scanner.index()..].starts_with('/') {
            scanner.scan_reg_exp().expect("regex scan")
        } else {
            scanner.lex().expect("token scan")
        };
        if token.kind == TokenKind::Eof {
            return count;
        }
        count += 1;
    }
}

fn bench_scanner(c: &mut Criterion) {
    c.bench_function("scan_fixture", |b| {
        b.iter(|| scan_fixture(black_box(FIXTURE)))
    });

    let wide = FIXTURE.repeat(64);
    c.bench_function("scan_fixture_x64", |b| {
        b.iter(|| scan_fixture(black_box(&wide)))
    });
}

criterion_group!(benches, bench_scanner);
criterion_main!(benches);
