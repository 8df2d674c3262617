//! Typed value → wire form.

use tracing::trace;

use crate::error::ApiError;
use crate::field::{Channel, FieldKind, SchemaVersion};
use crate::form::EncodedForm;
use crate::wire::Mapped;

/// Encode `value` for `channel` under the default schema version.
pub fn encode<T: Mapped>(value: &T, channel: Channel) -> Result<EncodedForm, ApiError> {
    encode_versioned(value, channel, SchemaVersion::default())
}

/// Encode `value` for `channel` under `version`.
///
/// Fields are visited in declaration order. Optional zero fields are
/// elided, required zero fields (nested ones included) fail with
/// [`ApiError::MissingRequiredField`], and nested values are flattened
/// into the same form without key prefixes.
pub fn encode_versioned<T: Mapped>(
    value: &T,
    channel: Channel,
    version: SchemaVersion,
) -> Result<EncodedForm, ApiError> {
    let table = T::field_table()?;
    let mut form = EncodedForm::new();

    for (name, field) in value.wire_fields() {
        let Some(spec) = table.spec(name, channel, version) else {
            continue;
        };

        if field.is_zero() {
            if spec.required {
                return Err(ApiError::MissingRequiredField(spec.wire_name.to_string()));
            }
            trace!(field = name, wire_name = spec.wire_name, "eliding zero field");
            continue;
        }

        match spec.kind {
            FieldKind::Nested => {
                let nested = field
                    .encode_nested(channel, version)
                    .ok_or(ApiError::NotNested(name))??;
                form.merge(nested);
            }
            FieldKind::Scalar | FieldKind::Slice => {
                for v in field.wire_values() {
                    form.append(spec.wire_name, v);
                }
            }
        }
    }

    Ok(form)
}
