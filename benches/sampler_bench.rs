#[macro_use]
extern crate criterion;
extern crate latgauss;

use criterion::Criterion;
use latgauss::{BaseCdtSampler, ConvolutionSampler, VarCenterSampler};

fn bench_base_cdt_sample(c: &mut Criterion) {
    c.bench_function("base_cdt_sample", |b| {
        let mut sampler = BaseCdtSampler::new(0.0, 10.0);
        b.iter(|| sampler.sample())
    });
}

fn bench_var_center_sample(c: &mut Criterion) {
    c.bench_function("var_center_sample", |b| {
        let mut sampler = VarCenterSampler::new(10.0);
        b.iter(|| sampler.sample(0.7))
    });
}

fn bench_convolution_sample(c: &mut Criterion) {
    c.bench_function("convolution_sample", |b| {
        let mut sampler = ConvolutionSampler::new(256.0).expect("valid construction");
        let sig_bar = sampler.sig_bar();
        b.iter(|| sampler.sample(0.0, sig_bar * 2.0))
    });
}

criterion_group!(
    benches,
    bench_base_cdt_sample,
    bench_var_center_sample,
    bench_convolution_sample
);
criterion_main!(benches);
