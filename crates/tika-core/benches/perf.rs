use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tika_core::{PaneState, Session};

/// A pane with `n` highlighted words separated by filler text.
fn big_pane(n: usize) -> PaneState {
    let mut text = String::new();
    for i in 0..n {
        text.push_str(&format!("word{i} filler "));
    }
    let mut pane = PaneState::new();
    pane.set_plain_text(&text);

    let mut offset = 0;
    for i in 0..n {
        let word_len = format!("word{i}").chars().count();
        pane.create_highlight(offset..offset + word_len)
            .expect("benchmark highlights are disjoint");
        offset += word_len + " filler ".chars().count();
    }
    pane
}

fn bench_markup_parse(c: &mut Criterion) {
    let markup = big_pane(200).markup();
    c.bench_function("markup_parse_200_highlights", |b| {
        b.iter(|| tika_core::markup::parse(black_box(&markup)))
    });
}

fn bench_renumber(c: &mut Criterion) {
    let pane = big_pane(200);
    c.bench_function("renumber_200_highlights", |b| {
        b.iter_batched(
            || pane.clone(),
            |mut pane| {
                pane.renumber();
                pane
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_alignment(c: &mut Criterion) {
    let mut session = Session::new();
    let record = tika_core::ProjectRecord {
        source: tika_core::PaneRecord::from_pane(&big_pane(200)),
        translation: tika_core::PaneRecord::from_pane(&big_pane(200)),
    };
    session.import_project(&record);
    c.bench_function("alignment_200_pairs", |b| {
        b.iter(|| black_box(&session).alignment())
    });
}

criterion_group!(benches, bench_markup_parse, bench_renumber, bench_alignment);
criterion_main!(benches);
