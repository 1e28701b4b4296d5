use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Sentinel used when a product is created without a thumbnail.
pub const NO_IMAGE_THUMBNAIL: &str = "no image";

/// Who may manage a product besides administrators.
///
/// Products created by premium users carry that user's email; everything
/// else belongs to the `admin` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductOwner {
    Admin,
    Premium(String),
}

impl ProductOwner {
    /// Whether the given email owns this product.
    pub fn is_owned_by(&self, email: &str) -> bool {
        matches!(self, Self::Premium(owner) if owner == email)
    }
}

impl std::fmt::Display for ProductOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Premium(email) => write!(f, "{}", email),
        }
    }
}

/// Product entity as held by the store.
///
/// Never exposed directly; callers see [`ProductDto`].
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    /// Unique across all products; enforced by the store on insert
    pub code: String,
    /// Availability flag; true = available
    pub status: bool,
    pub stock: i64,
    pub category: String,
    pub owner: ProductOwner,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Apply a patch in place; only named fields change.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(ref thumbnail) = patch.thumbnail {
            self.thumbnail = thumbnail.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(ref category) = patch.category {
            self.category = category.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// The public projection of a product; the only shape callers receive.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub status: bool,
    pub stock: i64,
    pub category: String,
    /// `"admin"` or the owning premium user's email
    pub owner: String,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            thumbnail: product.thumbnail,
            code: product.code,
            status: product.status,
            stock: product.stock,
            category: product.category,
            owner: product.owner.to_string(),
        }
    }
}

/// Availability flag as submitted by clients: either a boolean or its
/// string spelling.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StatusFlag {
    Flag(bool),
    Text(String),
}

impl StatusFlag {
    /// Normalize to a boolean: true unless explicitly `false` or `"false"`.
    pub fn normalize(&self) -> bool {
        match self {
            Self::Flag(value) => *value,
            Self::Text(value) => value != "false",
        }
    }
}

/// DTO for creating a new product.
///
/// Fields arrive loosely typed on purpose: presence and numeric-range
/// checks are catalog rules and produce `INVALID_PRODUCT_DATA`, not a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewProduct {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub status: Option<StatusFlag>,
    pub stock: Option<i64>,
    #[serde(default)]
    pub category: String,
    /// Email of the creating user; resolves to the owner per the
    /// premium-or-admin rule
    #[serde(default)]
    pub owner: Option<String>,
}

/// DTO for updating an existing product.
///
/// Ownership is fixed at creation; the patch deliberately has no owner or
/// code field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub status: Option<bool>,
    pub stock: Option<i64>,
    pub category: Option<String>,
}

impl ProductPatch {
    /// True when no field is set; such a patch is an error upstream.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.thumbnail.is_none()
            && self.status.is_none()
            && self.stock.is_none()
            && self.category.is_none()
    }
}

/// Raw listing query parameters.
///
/// `page` and `limit` stay strings until the service parses them: a
/// non-numeric page is a catalog rule violation (`INVALID_PAGE_NUMBER`),
/// not a transport error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductListQuery {
    /// Page to fetch (1-based, required)
    pub page: Option<String>,
    /// Page size (default 10)
    pub limit: Option<String>,
    /// `asc`/`desc` price ordering; anything else is ignored
    pub sort: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// `"true"`/`"false"` availability filter
    pub availability: Option<String>,
}

/// Parsed store filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub status: Option<bool>,
}

/// Price ordering for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrder {
    Asc,
    Desc,
}

/// Parsed listing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
    pub sort: Option<PriceOrder>,
}

/// One page of store results plus the total matching count.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
}
