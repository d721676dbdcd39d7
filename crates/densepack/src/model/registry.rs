// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide, insert-only cache of type models.
//!
//! Models are registered lazily on first encounter and live for the process:
//! the registry never re-discovers, invalidates or evicts an entry. Insertion
//! is concurrent-safe; the first registration for a name wins.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use super::TypeModel;
use crate::error::{CodecError, Result};

static GLOBAL_REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

/// Concurrent map from type name to cached [`TypeModel`].
pub struct ModelRegistry {
    models: DashMap<Arc<str>, Arc<TypeModel>>,
}

impl ModelRegistry {
    fn new() -> Self {
        Self {
            models: DashMap::new(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static ModelRegistry {
        GLOBAL_REGISTRY.get_or_init(ModelRegistry::new)
    }

    /// Cache a model. Monotonic: if the name is already bound, the cached
    /// model is returned unchanged and the new one is discarded.
    pub fn register(&self, model: TypeModel) -> Arc<TypeModel> {
        let name: Arc<str> = Arc::from(model.type_name());
        let entry = self
            .models
            .entry(name.clone())
            .or_insert_with(|| {
                log::debug!(
                    "[model] registered {} ({} members, include_all={})",
                    name,
                    model.member_count(),
                    model.include_all()
                );
                Arc::new(model)
            });
        entry.value().clone()
    }

    /// Fetch a cached model.
    pub fn lookup(&self, type_name: &str) -> Option<Arc<TypeModel>> {
        self.models.get(type_name).map(|e| e.value().clone())
    }

    /// Fetch a cached model or fail the way discovery does for a type that
    /// opted out of serialization.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<TypeModel>> {
        self.lookup(type_name).ok_or_else(|| CodecError::InvalidOperation {
            reason: format!(
                "type {} is not serializable and no wrapper registered",
                type_name
            ),
        })
    }
}
