use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use marivor_core::{Cart, Category, ContextData, Pipeline, PipelineControl, Product, ShopError, WorkflowError};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Debug, thiserror::Error)]
enum BenchError {
  #[error(transparent)]
  Shop(#[from] ShopError),
  #[error(transparent)]
  Workflow(#[from] WorkflowError),
}

fn catalog(size: usize) -> Vec<Product> {
  (0..size)
    .map(|i| Product {
      id: i as i64,
      name: format!("product_{}", i),
      category: if i % 2 == 0 { Category::Fish } else { Category::Vegetable },
      price_cents: 50 + i as i64,
      stock: 1_000,
      sold_by_weight: i % 3 == 0,
      seller_id: Some((i % 4) as i64),
    })
    .collect()
}

fn bench_cart_add_and_update(c: &mut Criterion) {
  let mut group = c.benchmark_group("CartRecompute");

  for lines in [1usize, 10, 100].iter() {
    let products = catalog(*lines);
    group.throughput(Throughput::Elements(*lines as u64));

    group.bench_with_input(BenchmarkId::new("add_all", lines), &products, |b, products| {
      b.iter(|| {
        let mut cart = Cart::new();
        for p in products {
          cart.add(p, 2).unwrap();
        }
        cart.total_price_cents()
      });
    });

    let mut filled = Cart::new();
    for p in &products {
      filled.add(p, 1).unwrap();
    }
    group.bench_with_input(BenchmarkId::new("update_last", lines), &filled, |b, filled| {
      b.iter_batched(
        || filled.clone(),
        |mut cart| {
          let last = (*lines - 1) as i64;
          cart.update(last, 3).unwrap();
          cart.total_items()
        },
        criterion::BatchSize::SmallInput,
      );
    });

    group.bench_with_input(BenchmarkId::new("lines_by_seller", lines), &filled, |b, filled| {
      b.iter(|| filled.lines_by_seller().len());
    });
  }
  group.finish();
}

fn bench_cart_pipeline(c: &mut Criterion) {
  let mut group = c.benchmark_group("CartPipeline");
  let rt = Runtime::new().unwrap();
  let product = catalog(1).remove(0);

  let mut pipeline = Pipeline::<Cart, BenchError>::new(&[("validate", false), ("apply", false)]);
  pipeline.on_root("validate", |_ctx: ContextData<Cart>| {
    Box::pin(async move { Ok::<_, ShopError>(PipelineControl::Continue) })
  });
  pipeline.on_root("apply", move |ctx: ContextData<Cart>| {
    let product = product.clone();
    Box::pin(async move {
      ctx.write().add(&product, 1)?;
      Ok::<_, ShopError>(PipelineControl::Continue)
    })
  });
  let pipeline = Arc::new(pipeline);

  group.bench_function("add_one_line", |b| {
    b.to_async(&rt).iter_batched(
      || ContextData::new(Cart::new()),
      |ctx| {
        let p = pipeline.clone();
        async move { p.run(ctx).await.unwrap() }
      },
      criterion::BatchSize::SmallInput,
    );
  });
  group.finish();
}

criterion_group!(benches, bench_cart_add_and_update, bench_cart_pipeline);
criterion_main!(benches);
