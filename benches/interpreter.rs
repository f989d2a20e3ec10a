mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use forscript::interpreter::Interpreter;

fn bench_interpreter(c: &mut Criterion) {
    for (label, source) in common::workloads() {
        let program = common::load_program(&source);

        c.bench_function(&format!("interpreter_run_{label}"), |b| {
            b.iter(|| {
                let mut interpreter = Interpreter::new(Vec::with_capacity(64));
                interpreter.run(black_box(&program)).expect("run");
                black_box(interpreter.into_output());
            })
        });
    }
}

criterion_group!(benches, bench_interpreter);
criterion_main!(benches);
