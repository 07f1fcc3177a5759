mod error;

use bytes::Bytes;
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use store::{FragmentList, FragmentRecord, Store};
use uuid::Uuid;

use crate::convert;
use crate::media;

pub use error::{FragmentError, ValidationError};

/// Constructor input for [`Fragment::new`].
///
/// Only `owner_id` and `fragment_type` are required; everything else is
/// generated when left unset.
#[derive(Debug, Clone, Default)]
pub struct NewFragment {
    pub owner_id: String,
    pub fragment_type: String,
    pub size: Option<i64>,
    pub id: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl NewFragment {
    pub fn new(owner_id: impl Into<String>, fragment_type: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            fragment_type: fragment_type.into(),
            ..Default::default()
        }
    }
}

/// A user's fragments, as returned by [`Fragment::by_user`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserFragments {
    Ids(Vec<String>),
    Expanded(Vec<Fragment>),
}

impl UserFragments {
    pub fn len(&self) -> usize {
        match self {
            UserFragments::Ids(ids) => ids.len(),
            UserFragments::Expanded(fragments) => fragments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One owner's content unit: metadata plus a payload held by the [`Store`].
///
/// The id can't be changed once a fragment exists, so there is no setter for
/// it. `updated` never precedes `created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fragment {
    record: FragmentRecord,
}

/// Current time at the precision metadata is persisted with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

impl Fragment {
    /// Validate `input` and build an unsaved fragment.
    pub fn new(input: NewFragment) -> Result<Self, ValidationError> {
        let NewFragment {
            owner_id,
            fragment_type,
            size,
            id,
            created,
            updated,
        } = input;

        if owner_id.is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        if fragment_type.trim().is_empty() {
            return Err(ValidationError::EmptyType);
        }
        if !media::is_supported_type(&fragment_type) {
            return Err(ValidationError::UnsupportedType(fragment_type));
        }
        let size = match size {
            Some(size) if size < 0 => return Err(ValidationError::NegativeSize(size)),
            Some(size) => size as u64,
            None => 0,
        };

        let created = created.unwrap_or_else(now);
        let updated = updated.unwrap_or(created.max(now()));
        if updated < created {
            return Err(ValidationError::UpdatedBeforeCreated {
                created: created.to_rfc3339(),
                updated: updated.to_rfc3339(),
            });
        }

        let id = match id {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        Ok(Self {
            record: FragmentRecord {
                id,
                owner_id,
                fragment_type,
                size,
                created,
                updated,
            },
        })
    }

    /// Rebuild a fragment from a persisted record, re-checking its invariants.
    pub fn from_record(record: FragmentRecord) -> Result<Self, ValidationError> {
        let size = i64::try_from(record.size).unwrap_or(i64::MAX);
        Self::new(NewFragment {
            owner_id: record.owner_id,
            fragment_type: record.fragment_type,
            size: Some(size),
            id: Some(record.id),
            created: Some(record.created),
            updated: Some(record.updated),
        })
    }

    /// List an owner's fragments.
    ///
    /// # Arguments
    /// * `store` - The storage facade
    /// * `owner_id` - Whose fragments to list
    /// * `expand` - Return full fragments instead of ids
    ///
    /// # Returns
    /// * `Ok(UserFragments)` - The owner's fragments, in no particular order
    /// * `Err(FragmentError)` - The store failed or returned an invalid record
    pub async fn by_user(
        store: &Store,
        owner_id: &str,
        expand: bool,
    ) -> Result<UserFragments, FragmentError> {
        match store.list_fragments(owner_id, expand).await? {
            FragmentList::Ids(ids) => Ok(UserFragments::Ids(ids)),
            FragmentList::Records(records) => {
                let fragments = records
                    .into_iter()
                    .map(Fragment::from_record)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(UserFragments::Expanded(fragments))
            }
        }
    }

    /// Look up one of an owner's fragments. Absence is `Ok(None)`.
    pub async fn by_id(
        store: &Store,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<Self>, FragmentError> {
        match store.read_fragment(owner_id, id).await? {
            Some(record) => Ok(Some(Self::from_record(record)?)),
            None => Ok(None),
        }
    }

    /// Remove a fragment's payload and metadata. Deleting an absent fragment is fine.
    pub async fn delete_by_id(store: &Store, owner_id: &str, id: &str) -> Result<(), FragmentError> {
        store.delete_fragment(owner_id, id).await?;
        Ok(())
    }

    /// Persist the current metadata, refreshing `updated`.
    pub async fn save(&mut self, store: &Store) -> Result<(), FragmentError> {
        self.touch();
        store.write_fragment(&self.record).await?;
        Ok(())
    }

    /// The stored payload, `None` if none was ever written.
    pub async fn data(&self, store: &Store) -> Result<Option<Bytes>, FragmentError> {
        Ok(store
            .read_fragment_data(&self.record.owner_id, &self.record.id)
            .await?)
    }

    /// Replace the payload and re-save metadata with the new size.
    ///
    /// The payload is written before the metadata; the two writes are not
    /// atomic.
    pub async fn set_data(
        &mut self,
        store: &Store,
        data: impl Into<Bytes>,
    ) -> Result<(), FragmentError> {
        let data = data.into();
        let size = data.len() as u64;
        tracing::debug!(
            owner_id = %self.record.owner_id,
            id = %self.record.id,
            size,
            "setting fragment data"
        );
        store
            .write_fragment_data(&self.record.owner_id, &self.record.id, data)
            .await?;
        self.record.size = size;
        self.save(store).await
    }

    /// Like [`Fragment::set_data`], but only if `declared_type` has the same
    /// base media type as the fragment. Nothing is written on mismatch.
    pub async fn replace_data(
        &mut self,
        store: &Store,
        declared_type: &str,
        data: impl Into<Bytes>,
    ) -> Result<(), FragmentError> {
        let declared = media::essence(declared_type);
        if declared.as_deref() != Some(self.mime_type().as_str()) {
            tracing::debug!(
                id = %self.record.id,
                expected = %self.mime_type(),
                declared_type,
                "rejecting payload with a different type"
            );
            return Err(FragmentError::TypeMismatch {
                expected: self.mime_type(),
                actual: declared_type.to_string(),
            });
        }
        self.set_data(store, data).await
    }

    pub async fn delete(&self, store: &Store) -> Result<(), FragmentError> {
        Self::delete_by_id(store, &self.record.owner_id, &self.record.id).await
    }

    fn touch(&mut self) {
        self.record.updated = self.record.created.max(now());
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn owner_id(&self) -> &str {
        &self.record.owner_id
    }

    /// The full media type, parameters included.
    pub fn fragment_type(&self) -> &str {
        &self.record.fragment_type
    }

    pub fn size(&self) -> u64 {
        self.record.size
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.record.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.record.updated
    }

    /// The base media type: `text/html; charset=utf-8` is `text/html`.
    pub fn mime_type(&self) -> String {
        media::essence(&self.record.fragment_type)
            .unwrap_or_else(|| self.record.fragment_type.to_ascii_lowercase())
    }

    pub fn is_text(&self) -> bool {
        self.mime_type().starts_with("text/")
    }

    /// Media types this fragment can be converted to.
    pub fn formats(&self) -> Vec<String> {
        convert::formats(&self.mime_type())
    }
}
