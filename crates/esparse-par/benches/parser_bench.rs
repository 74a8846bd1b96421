//! Parser throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esparse_par::{Parser, ParserConfig};

const FIXTURE: &str = r#"
'use strict';
class Greeter {
    constructor(name) {
        this.name = name;
    }
    greet(prefix = "Hello") {
        return `${prefix}, ${this.name}!`;
    }
}

function* naturals() {
    let n = 0;
    while (true) {
        yield n++;
    }
}

async function main() {
    const greeter = new Greeter("world");
    const [first, ...rest] = [1, 2, 3].map((x, i) => x * i);
    for (const n of naturals()) {
        if (n > first) break;
    }
    return await Promise.resolve(greeter.greet());
}
"#;

fn bench_parser(c: &mut Criterion) {
    c.bench_function("parse_fixture", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(FIXTURE), ParserConfig::default());
            parser.parse_script().expect("fixture parses")
        })
    });

    let wide = FIXTURE.repeat(32);
    c.bench_function("parse_fixture_x32", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(wide.as_str()), ParserConfig::default());
            parser.parse_script().expect("fixture parses")
        })
    });
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
