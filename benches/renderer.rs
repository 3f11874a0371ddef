use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timeline_rs_renderer::config::{LayoutConfig, TrackKind};
use timeline_rs_renderer::ir::{TimelineDocument, parse_document};
use timeline_rs_renderer::layout::compute_layout;
use timeline_rs_renderer::render::render_svg;
use timeline_rs_renderer::surface::{CalibratedSurface, MonospaceSurface};
use timeline_rs_renderer::theme::Theme;

const TITLES: [&str; 6] = [
    "Founded in a garage",
    "First customer signed after a long pilot",
    "Series A",
    "Opened the Berlin office and hired the first support team",
    "Platform rewrite",
    "IPO",
];

fn timeline_source(items: usize) -> String {
    let mut out = String::from("{\"title\":\"Benchmark\",\"items\":[");
    for i in 0..items {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "{{\"year\":\"{}\",\"title\":\"{}\"}}",
            1990 + i,
            TITLES[i % TITLES.len()]
        ));
    }
    out.push_str("]}");
    out
}

fn timeline(items: usize) -> TimelineDocument {
    parse_document(&timeline_source(items)).expect("parse failed")
}

fn presets() -> [(&'static str, Theme, LayoutConfig); 2] {
    [
        ("classic", Theme::classic(), LayoutConfig::classic()),
        ("refined", Theme::refined(), LayoutConfig::refined()),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for items in [6usize, 24, 96] {
        let input = timeline_source(items);
        group.bench_with_input(BenchmarkId::from_parameter(items), &input, |b, data| {
            b.iter(|| {
                let doc = parse_document(black_box(data)).expect("parse failed");
                black_box(doc.items.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for (preset, theme, config) in presets() {
        for track in [TrackKind::Curve, TrackKind::Zigzag] {
            let style = config.track_style(track);
            for items in [6usize, 24, 96] {
                let doc = timeline(items);
                let name = format!("{preset}_{track:?}_{items}");
                group.bench_with_input(BenchmarkId::from_parameter(name), &doc, |b, doc| {
                    b.iter(|| {
                        let scene = compute_layout(
                            black_box(doc),
                            &style,
                            &theme,
                            &config,
                            &mut MonospaceSurface::default(),
                        )
                        .expect("layout failed");
                        black_box(scene.markers.len());
                    });
                });
            }
        }
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    for (preset, theme, config) in presets() {
        let style = config.track_style(TrackKind::Curve);
        for items in [6usize, 24, 96] {
            let scene = compute_layout(
                &timeline(items),
                &style,
                &theme,
                &config,
                &mut MonospaceSurface::default(),
            )
            .expect("layout failed");
            let name = format!("{preset}_{items}");
            group.bench_with_input(BenchmarkId::from_parameter(name), &scene, |b, scene| {
                b.iter(|| {
                    let svg = render_svg(black_box(scene), &theme);
                    black_box(svg.len());
                });
            });
        }
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::classic();
    let config = LayoutConfig::classic();
    let style = config.track_style(TrackKind::Curve);
    for items in [6usize, 24] {
        let input = timeline_source(items);
        group.bench_with_input(BenchmarkId::from_parameter(items), &input, |b, data| {
            b.iter(|| {
                let doc = parse_document(black_box(data)).expect("parse failed");
                let scene = compute_layout(&doc, &style, &theme, &config, &mut CalibratedSurface)
                    .expect("layout failed");
                let svg = render_svg(&scene, &theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_render, bench_end_to_end
);
criterion_main!(benches);
