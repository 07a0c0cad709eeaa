/// Data layer: core types, loading, and the labeling pipeline.
///
/// Architecture:
/// ```text
///  filter path                         merge path
///  ───────────                         ──────────
///   .csv                                .csv  .csv  …
///     │ loader                            │ loader
///     ▼                                   ▼
///   Table ── schema (validate)          merge (combine)
///     │                                   │
///     ▼                                   ▼
///   normalize (labels)                  pseudo_label (Null cells only)
///     │                                   │
///     ▼                                   ▼
///   partition → labeled                 index (classification_id)
///             → unlabeled ── pseudo_label
/// ```

pub mod index;
pub mod loader;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod partition;
pub mod pseudo_label;
pub mod schema;
