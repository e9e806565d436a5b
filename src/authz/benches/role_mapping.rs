//! Role mapping benchmarks
//!
//! The mapper sits on the per-authentication hot path; these benchmarks
//! track substitution cost against role-set size for both substitution
//! modes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use palisade_authz::{RegexRoleMapper, RegexRoleMapperConfig, RoleSet};

fn create_role_set(count: usize) -> RoleSet {
    (0..count)
        .map(|i| match i % 3 {
            0 => format!("app-guest-{}", i),
            1 => format!("app-guest-first-time-guest-{}", i),
            _ => format!("unmapped-role-{}", i),
        })
        .collect()
}

fn bench_role_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("role_mapping");

    for role_count in [4, 32, 256].iter() {
        let input = create_role_set(*role_count);

        let replace_first =
            RegexRoleMapper::new(&RegexRoleMapperConfig::new("guest", "user")).unwrap();
        group.bench_with_input(
            BenchmarkId::new("replace_first", role_count),
            &input,
            |b, roles| {
                b.iter(|| black_box(replace_first.map(black_box(roles))));
            },
        );

        let replace_all = RegexRoleMapper::new(
            &RegexRoleMapperConfig::new("guest", "user").with_replace_all(true),
        )
        .unwrap();
        group.bench_with_input(
            BenchmarkId::new("replace_all", role_count),
            &input,
            |b, roles| {
                b.iter(|| black_box(replace_all.map(black_box(roles))));
            },
        );

        let keep_non_mapped = RegexRoleMapper::new(
            &RegexRoleMapperConfig::new("guest", "user").with_keep_non_mapped(true),
        )
        .unwrap();
        group.bench_with_input(
            BenchmarkId::new("keep_non_mapped", role_count),
            &input,
            |b, roles| {
                b.iter(|| black_box(keep_non_mapped.map(black_box(roles))));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_role_mapping);
criterion_main!(benches);
