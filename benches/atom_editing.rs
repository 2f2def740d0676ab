//! Benchmarks for in-memory atom editing
//!
//! Tests performance of building and splicing ilst, ftyp and text tracks
//! into a buffer, without touching the disk.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use tagforged_bmff::bmff::{fullbox_header, write_box, write_container_box, AtomBuffer, AtomType};
use tagforged_bmff::ftyp::apply_brand;
use tagforged_bmff::ilst::apply_ilst;
use tagforged_bmff::text_track::apply_text_track;
use tagforged_bmff::{
    build_ilst, build_trak, OutputProfile, TagKey, TagValue, Tags, TimedTextSample,
    TimedTextTrack,
};

/// ftyp + moov(mvhd, udta/meta) + mdat of `media_len` bytes
fn movie(media_len: usize) -> Vec<u8> {
    let mut mvhd = vec![0u8; 96];
    mvhd[..4].copy_from_slice(&fullbox_header(0, 0));
    mvhd[92..].copy_from_slice(&2u32.to_be_bytes());
    let mvhd = write_box(AtomType::MVHD, &mvhd);
    let meta = write_box(AtomType::META, &fullbox_header(0, 0));
    let udta = write_container_box(AtomType::UDTA, &[&meta]);

    let mut out = write_box(AtomType::FTYP, b"isom\0\0\0\0isom");
    out.extend(write_container_box(AtomType::MOOV, &[&mvhd, &udta]));
    out.extend(write_box(AtomType::MDAT, &vec![0u8; media_len]));
    out
}

fn full_tags() -> Tags {
    let mut tags = Tags::new();
    for (key, text) in [
        (TagKey::Title, "Tears of Steel"),
        (TagKey::Artist, "Blender Foundation"),
        (TagKey::Genre, "Science Fiction"),
        (TagKey::Date, "2012"),
    ] {
        tags.insert(key, text).unwrap();
    }
    tags.insert(TagKey::TrackNumber, TagValue::Pair { index: 1, total: 1 })
        .unwrap();
    tags.insert(TagKey::Cover, TagValue::image(vec![0xFF; 64 * 1024]))
        .unwrap();
    tags
}

fn captions(count: usize) -> TimedTextTrack {
    let samples = (0..count)
        .map(|i| {
            TimedTextSample::new(
                Duration::from_secs(i as u64 * 3),
                Duration::from_millis(2500),
                format!("Caption number {i}"),
            )
        })
        .collect();
    TimedTextTrack::new(samples).with_track_id(2)
}

fn bench_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("builders");
    let tags = full_tags();

    group.bench_function("build_ilst/with_cover", |b| {
        b.iter(|| build_ilst(black_box(&tags)));
    });

    for count in [10, 1000] {
        let track = captions(count);
        group.bench_with_input(BenchmarkId::new("build_trak", count), &track, |b, track| {
            b.iter(|| build_trak(black_box(track), 0).unwrap());
        });
    }

    group.finish();
}

fn bench_splices(c: &mut Criterion) {
    let mut group = c.benchmark_group("splices");
    let tags = full_tags();
    let track = captions(500);

    for media_len in [64 * 1024, 8 * 1024 * 1024] {
        let source = movie(media_len);

        group.bench_with_input(BenchmarkId::new("apply_ilst", media_len), &source, |b, src| {
            b.iter(|| {
                let mut buf = AtomBuffer::new(src.clone());
                apply_ilst(&mut buf, black_box(&tags)).unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("apply_brand", media_len), &source, |b, src| {
            b.iter(|| {
                let mut buf = AtomBuffer::new(src.clone());
                apply_brand(&mut buf, black_box(OutputProfile::Video)).unwrap()
            });
        });

        group.bench_with_input(
            BenchmarkId::new("apply_text_track", media_len),
            &source,
            |b, src| {
                b.iter(|| {
                    let mut buf = AtomBuffer::new(src.clone());
                    apply_text_track(&mut buf, black_box(&track)).unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_builders, bench_splices);
criterion_main!(benches);
