//! Owned item records.
//!
//! An item always belongs to exactly one user. Updates change the payload
//! (`name`, `description`, `price`) and never the owner.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum item name length in characters.
pub const ITEM_NAME_MAX: usize = 100;
/// Maximum item description length in characters.
pub const ITEM_DESCRIPTION_MAX: usize = 500;
/// Largest page size accepted by listings.
pub const PAGE_LIMIT_MAX: i64 = 100;

/// Validation errors for item payloads and listing windows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    /// Identifier was not a UUID.
    #[error("item id must be a valid UUID")]
    InvalidId,
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded [`ITEM_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum length.
        max: usize,
    },
    /// Description exceeded [`ITEM_DESCRIPTION_MAX`].
    #[error("description must be at most {max} characters")]
    DescriptionTooLong {
        /// Maximum length.
        max: usize,
    },
    /// Price was negative, NaN or infinite.
    #[error("price must be a finite number greater than or equal to zero")]
    InvalidPrice,
    /// Offset was negative.
    #[error("offset must be greater than or equal to zero")]
    NegativeOffset,
    /// Limit fell outside `1..=PAGE_LIMIT_MAX`.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Maximum page size.
        max: i64,
    },
}

impl ItemValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::DescriptionTooLong { .. } => "description",
            Self::InvalidPrice => "price",
            Self::NegativeOffset => "offset",
            Self::LimitOutOfRange { .. } => "limit",
        }
    }
}

/// Item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Parse an identifier from text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| ItemValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_name(raw: &str) -> Result<String, ItemValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    if name.chars().count() > ITEM_NAME_MAX {
        return Err(ItemValidationError::NameTooLong { max: ITEM_NAME_MAX });
    }
    Ok(name.to_owned())
}

fn validate_description(raw: Option<&str>) -> Result<Option<String>, ItemValidationError> {
    match raw {
        None => Ok(None),
        Some(text) if text.chars().count() > ITEM_DESCRIPTION_MAX => {
            Err(ItemValidationError::DescriptionTooLong {
                max: ITEM_DESCRIPTION_MAX,
            })
        }
        Some(text) => Ok(Some(text.to_owned())),
    }
}

fn validate_price(price: f64) -> Result<f64, ItemValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ItemValidationError::InvalidPrice)
    }
}

/// Validated payload for a new item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    name: String,
    description: Option<String>,
    price: f64,
}

impl ItemDraft {
    /// Validate raw inputs into a draft.
    ///
    /// # Examples
    /// ```
    /// use warden::domain::ItemDraft;
    ///
    /// let draft = ItemDraft::try_from_parts(" Lamp ", None, 12.5).unwrap();
    /// assert_eq!(draft.name(), "Lamp");
    /// assert!(ItemDraft::try_from_parts("Lamp", None, -1.0).is_err());
    /// ```
    pub fn try_from_parts(
        name: &str,
        description: Option<&str>,
        price: f64,
    ) -> Result<Self, ItemValidationError> {
        Ok(Self {
            name: validate_name(name)?,
            description: validate_description(description)?,
            price: validate_price(price)?,
        })
    }

    /// Item name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Item price.
    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Partial update. Absent fields are left unchanged.
///
/// `description` has three states: `None` keeps it, `Some(None)` clears it
/// and `Some(Some(text))` replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    name: Option<String>,
    description: Option<Option<String>>,
    price: Option<f64>,
}

impl ItemPatch {
    /// Validate the provided fields of an update payload.
    pub fn try_from_parts(
        name: Option<&str>,
        description: Option<Option<&str>>,
        price: Option<f64>,
    ) -> Result<Self, ItemValidationError> {
        Ok(Self {
            name: name.map(validate_name).transpose()?,
            description: description
                .map(validate_description)
                .transpose()?,
            price: price.map(validate_price).transpose()?,
        })
    }
}

/// Persisted item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    owner_id: UserId,
    name: String,
    description: Option<String>,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Mint a new item owned by `owner_id` from a validated draft.
    pub fn create(owner_id: UserId, draft: ItemDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::random(),
            owner_id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate an item from storage.
    #[expect(clippy::too_many_arguments, reason = "mirrors the stored row")]
    pub fn from_parts(
        id: ItemId,
        owner_id: UserId,
        name: String,
        description: Option<String>,
        price: f64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            description,
            price,
            created_at,
            updated_at,
        }
    }

    /// Apply a patch, bumping `updated_at`. The owner is untouched.
    #[must_use]
    pub fn apply(mut self, patch: ItemPatch, now: DateTime<Utc>) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = now;
        self
    }

    /// Item identifier.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Owning user.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Item name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Item price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Creation instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification instant.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Listing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: PAGE_LIMIT_MAX,
        }
    }
}

impl Page {
    /// Build a page from optional query values, applying defaults.
    pub fn try_new(offset: Option<i64>, limit: Option<i64>) -> Result<Self, ItemValidationError> {
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(PAGE_LIMIT_MAX);
        if offset < 0 {
            return Err(ItemValidationError::NegativeOffset);
        }
        if !(1..=PAGE_LIMIT_MAX).contains(&limit) {
            return Err(ItemValidationError::LimitOutOfRange {
                max: PAGE_LIMIT_MAX,
            });
        }
        Ok(Self { offset, limit })
    }

    /// Number of records to skip.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Maximum number of records to return.
    pub fn limit(&self) -> i64 {
        self.limit
    }
}
