//! Benchmarks for the sprite pipeline.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sprite_forge::{
    BatchCoordinator, BatchOptions, BufferPool, CompositeEngine, CompositeRequest,
    CompositionEngine, Direction, EffectKind, EquipmentSlot, EquipmentVisual, LayerConfig,
    LayerKind, Rarity, ShapeKind, SpriteGenerator, SpriteRequest, StatusEffect, TemplateLibrary,
};

fn humanoid(size: u32, seed: i64) -> SpriteRequest {
    SpriteRequest::entity(size, size, seed)
        .with_complexity(0.7)
        .with_entity_type("knight")
        .facing(Direction::Left)
        .with_weapon(true)
        .with_shield(true)
}

// -- Template benchmarks --

fn bench_templates(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");
    let request = humanoid(32, 1).boss(1.5);

    group.bench_function("select_humanoid", |b| {
        b.iter(|| TemplateLibrary::for_request(black_box(&request)))
    });

    group.bench_function("item_layout_legendary", |b| {
        b.iter(|| TemplateLibrary::select_item_layout(black_box("sword"), Rarity::Legendary))
    });

    group.finish();
}

// -- Generation benchmarks --

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    let engine = CompositionEngine::new();
    let pooled = CompositionEngine::new().with_pool(Arc::new(BufferPool::default()));
    let small = humanoid(16, 7);
    let large = humanoid(64, 7);

    group.bench_function("generate_16", |b| {
        b.iter(|| engine.generate(black_box(&small)).unwrap())
    });

    group.bench_function("generate_64", |b| {
        b.iter(|| engine.generate(black_box(&large)).unwrap())
    });

    group.bench_function("generate_64_pooled", |b| {
        b.iter(|| pooled.generate(black_box(&large)).unwrap())
    });

    let generator = SpriteGenerator::default();
    generator.generate(&large).unwrap();
    group.bench_function("generate_64_cached", |b| {
        b.iter(|| generator.generate(black_box(&large)).unwrap())
    });

    let composite = CompositeEngine::default();
    let request = CompositeRequest::new(SpriteRequest::entity(48, 48, 3))
        .with_layer(LayerConfig::new(LayerKind::Shadow, ShapeKind::Ellipse))
        .with_layer(LayerConfig::new(LayerKind::Body, ShapeKind::Organic).with_seed(4))
        .with_layer(LayerConfig::new(LayerKind::Head, ShapeKind::Circle).with_offset(0, -12))
        .with_equipment(EquipmentVisual::new(EquipmentSlot::Weapon, "sword", 9))
        .with_effect(StatusEffect::new(EffectKind::Burn, 0.8, 24));

    group.bench_function("composite_48", |b| {
        b.iter(|| composite.generate_composite(black_box(&request)).unwrap())
    });

    group.finish();
}

// -- Batch benchmarks --

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(20);

    let requests: Vec<SpriteRequest> = (0..32).map(|seed| humanoid(32, seed)).collect();
    let coordinator = BatchCoordinator::new(CompositionEngine::new());

    group.bench_function("batch_32_sequential", |b| {
        b.iter(|| {
            coordinator.batch_generate(
                black_box(&requests),
                &BatchOptions::sequential(),
                |_, _| {},
                |_, _| {},
            )
        })
    });

    group.bench_function("batch_32_workers_4", |b| {
        b.iter(|| {
            coordinator.batch_generate(
                black_box(&requests),
                &BatchOptions::concurrent(4),
                |_, _| {},
                |_, _| {},
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_templates, bench_generation, bench_batch);
criterion_main!(benches);
