use crate::domain::{FieldValue, Item, MetadataRecord, STATUS_FIELD};
use crate::error::{FolioError, FolioResult};
use crate::host::MetadataProvider;
use tracing::debug;

/// Read-through view of item metadata backed by the host's frontmatter cache.
pub struct MetadataIndex<'a, P: ?Sized> {
    provider: &'a P,
    default_status: &'a str,
}

impl<'a, P: MetadataProvider + ?Sized> MetadataIndex<'a, P> {
    /// `default_status` is reported for items without a status of their own.
    pub fn new(provider: &'a P, default_status: &'a str) -> Self {
        MetadataIndex {
            provider,
            default_status,
        }
    }

    /// Derives the metadata record of `item`. Never touches storage.
    pub fn extract(&self, item: &Item) -> MetadataRecord {
        let properties = self.provider.frontmatter(item);
        let status = match properties.get(STATUS_FIELD) {
            Some(value) if !value.is_falsy() => value.to_string(),
            _ => self.default_status.to_owned(),
        };
        MetadataRecord { status, properties }
    }

    /// Persists `field = value` into `item`'s frontmatter. A falsy value
    /// removes the field instead.
    ///
    /// Callers update their in-memory copy only after this returns `Ok`.
    pub async fn write(&self, item: &Item, field: &str, value: FieldValue) -> FolioResult<()> {
        debug!(path = %item.path, field, "writing metadata field");
        let key = field.to_owned();
        self.provider
            .mutate_frontmatter(
                item,
                Box::new(move |fm| {
                    if value.is_falsy() {
                        fm.shift_remove(&key);
                    } else {
                        fm.insert(key, value);
                    }
                }),
            )
            .await
            .map_err(|source| FolioError::MetadataWrite {
                path: item.path.clone(),
                source,
            })
    }
}
