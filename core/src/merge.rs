//! Merge-with-previous: backfill a partial update from a fetched baseline.
//!
//! The upstream wants a full representation on every write. A caller that
//! only sets the fields it means to change passes the previously fetched
//! value as `baseline`; every required field left at zero is copied over
//! from it, optional zero fields stay zero and are elided on encode.

use tracing::trace;

use crate::error::ApiError;
use crate::field::{Channel, FieldKind, FieldTable, SchemaVersion};
use crate::wire::{Mapped, WireValue};

/// One table, channel and version applied to a `changes`/`baseline` pair.
#[derive(Debug, Clone, Copy)]
pub struct MergeContext {
    table: &'static FieldTable,
    channel: Channel,
    version: SchemaVersion,
}

impl MergeContext {
    pub fn new(table: &'static FieldTable, channel: Channel, version: SchemaVersion) -> Self {
        Self {
            table,
            channel,
            version,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Resolve one field in place.
    pub fn merge_field<V: WireValue + Clone>(
        &self,
        name: &'static str,
        target: &mut V,
        baseline: &V,
    ) -> Result<(), ApiError> {
        let Some(spec) = self.table.spec(name, self.channel, self.version) else {
            return Ok(());
        };
        if !spec.required {
            return Ok(());
        }

        if target.is_zero() && baseline.is_zero() {
            return Err(ApiError::MissingRequiredField(spec.wire_name.to_string()));
        }

        if spec.kind == FieldKind::Nested {
            return target.merge_nested(baseline, self.channel, self.version);
        }

        if target.is_zero() {
            trace!(field = name, "backfilling from baseline");
            *target = baseline.clone();
        }
        Ok(())
    }
}

/// Resolve `changes` against `baseline` for `channel` under the default
/// schema version.
pub fn resolve<T: Mapped + Clone>(
    changes: &T,
    baseline: &T,
    channel: Channel,
) -> Result<T, ApiError> {
    resolve_versioned(changes, baseline, channel, SchemaVersion::default())
}

pub fn resolve_versioned<T: Mapped + Clone>(
    changes: &T,
    baseline: &T,
    channel: Channel,
    version: SchemaVersion,
) -> Result<T, ApiError> {
    let mut resolved = changes.clone();
    resolve_in_place(&mut resolved, baseline, channel, version)?;
    Ok(resolved)
}

/// On error `target` may be partially backfilled and must be discarded.
pub fn resolve_in_place<T: Mapped>(
    target: &mut T,
    baseline: &T,
    channel: Channel,
    version: SchemaVersion,
) -> Result<(), ApiError> {
    let ctx = MergeContext::new(T::field_table()?, channel, version);
    target.backfill(baseline, &ctx)
}
