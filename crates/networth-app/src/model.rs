// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use time::{Date, OffsetDateTime};

use crate::fields::FieldType;
use crate::ids::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown {kind} category {value:?}")]
    UnknownCategory { kind: EntityKind, value: String },
    #[error("{0:?} is a fixed category but the record carries custom category data")]
    CustomDataOnFixedCategory(String),
    #[error("custom {0} record is missing its custom category name")]
    MissingTemplateName(EntityKind),
    #[error("fixed category cannot be `custom`; use a custom category shape instead")]
    CustomAsFixed,
}

/// Which side of the balance sheet a record or template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Asset,
    Liability,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asset" | "assets" => Some(Self::Asset),
            "liability" | "liabilities" => Some(Self::Liability),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform cell value: what a record field holds when viewed generically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged, from = "StoredScalar")]
pub enum Scalar {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

/// Stored custom values may also be booleans; they read back as `"true"`/`"false"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScalar {
    Number(f64),
    Text(String),
    Flag(bool),
    Null,
}

impl From<StoredScalar> for Scalar {
    fn from(value: StoredScalar) -> Self {
        match value {
            StoredScalar::Number(value) => Self::Number(value),
            StoredScalar::Text(value) => Self::Text(value),
            StoredScalar::Flag(value) => Self::Text(value.to_string()),
            StoredScalar::Null => Self::Null,
        }
    }
}

impl Scalar {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Stringified value; integers print without a fractional part.
    pub fn display(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::Null => String::new(),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Shared surface of the fixed category enums.
pub trait CategoryCode: Copy + PartialEq + fmt::Debug + 'static {
    const KIND: EntityKind;
    const CUSTOM: Self;

    fn as_str(self) -> &'static str;
    fn parse(value: &str) -> Option<Self>;
    fn label(self) -> &'static str;

    fn is_custom(self) -> bool {
        self == Self::CUSTOM
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Land,
    Gold,
    GoldScheme,
    LentMoney,
    Savings,
    FixedDeposit,
    Investment,
    Property,
    Retirement,
    Other,
    Custom,
}

impl AssetCategory {
    pub const ALL: [Self; 11] = [
        Self::Land,
        Self::Gold,
        Self::GoldScheme,
        Self::LentMoney,
        Self::Savings,
        Self::FixedDeposit,
        Self::Investment,
        Self::Property,
        Self::Retirement,
        Self::Other,
        Self::Custom,
    ];

    /// Selector order; custom categories are offered from loaded templates instead.
    pub const OPTIONS: [Self; 10] = [
        Self::Savings,
        Self::FixedDeposit,
        Self::Land,
        Self::Gold,
        Self::GoldScheme,
        Self::LentMoney,
        Self::Investment,
        Self::Property,
        Self::Retirement,
        Self::Other,
    ];
}

impl CategoryCode for AssetCategory {
    const KIND: EntityKind = EntityKind::Asset;
    const CUSTOM: Self = Self::Custom;

    fn as_str(self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::Gold => "gold",
            Self::GoldScheme => "gold_scheme",
            Self::LentMoney => "lent_money",
            Self::Savings => "savings",
            Self::FixedDeposit => "fixed_deposit",
            Self::Investment => "investment",
            Self::Property => "property",
            Self::Retirement => "retirement",
            Self::Other => "other",
            Self::Custom => "custom",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "land" => Some(Self::Land),
            "gold" => Some(Self::Gold),
            "gold_scheme" => Some(Self::GoldScheme),
            "lent_money" => Some(Self::LentMoney),
            "savings" => Some(Self::Savings),
            "fixed_deposit" => Some(Self::FixedDeposit),
            "investment" => Some(Self::Investment),
            "property" => Some(Self::Property),
            "retirement" => Some(Self::Retirement),
            "other" => Some(Self::Other),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Land => "Land",
            Self::Gold => "Gold",
            Self::GoldScheme => "Gold Scheme",
            Self::LentMoney => "Lent Money",
            Self::Savings => "Savings Account",
            Self::FixedDeposit => "Fixed Deposit",
            Self::Investment => "Investment",
            Self::Property => "Property",
            Self::Retirement => "Retirement",
            Self::Other => "Other",
            Self::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilityCategory {
    Credit,
    Loan,
    Mortgage,
    Tax,
    Other,
    Custom,
}

impl LiabilityCategory {
    pub const ALL: [Self; 6] = [
        Self::Credit,
        Self::Loan,
        Self::Mortgage,
        Self::Tax,
        Self::Other,
        Self::Custom,
    ];

    pub const OPTIONS: [Self; 5] = [
        Self::Credit,
        Self::Loan,
        Self::Mortgage,
        Self::Tax,
        Self::Other,
    ];
}

impl CategoryCode for LiabilityCategory {
    const KIND: EntityKind = EntityKind::Liability;
    const CUSTOM: Self = Self::Custom;

    fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Loan => "loan",
            Self::Mortgage => "mortgage",
            Self::Tax => "tax",
            Self::Other => "other",
            Self::Custom => "custom",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "credit" => Some(Self::Credit),
            "loan" => Some(Self::Loan),
            "mortgage" => Some(Self::Mortgage),
            "tax" => Some(Self::Tax),
            "other" => Some(Self::Other),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Credit => "Credit Card",
            Self::Loan => "Loan",
            Self::Mortgage => "Mortgage",
            Self::Tax => "Tax",
            Self::Other => "Other",
            Self::Custom => "Custom",
        }
    }
}

/// A user-authored field carried by a custom-category record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub value: Scalar,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Field shape stored on a template; it never carries a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldTemplate {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCategoryTemplate {
    #[serde(alias = "_id")]
    pub id: TemplateId,
    pub name: String,
    pub category_type: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub fields: Vec<CustomFieldTemplate>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Category of a record: either one of the fixed codes or a template-backed shape.
///
/// `Fixed(C::CUSTOM)` is never constructed; custom records always carry their
/// template name and fields.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryShape<C: CategoryCode> {
    Fixed(C),
    Custom {
        template_name: String,
        fields: Vec<CustomField>,
    },
}

impl<C: CategoryCode> CategoryShape<C> {
    pub fn fixed(category: C) -> Result<Self, ModelError> {
        if category.is_custom() {
            return Err(ModelError::CustomAsFixed);
        }
        Ok(Self::Fixed(category))
    }

    pub fn code(&self) -> C {
        match self {
            Self::Fixed(category) => *category,
            Self::Custom { .. } => C::CUSTOM,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    pub fn template_name(&self) -> Option<&str> {
        match self {
            Self::Fixed(_) => None,
            Self::Custom { template_name, .. } => Some(template_name),
        }
    }

    pub fn custom_fields(&self) -> &[CustomField] {
        match self {
            Self::Fixed(_) => &[],
            Self::Custom { fields, .. } => fields,
        }
    }

    pub fn custom_fields_mut(&mut self) -> Option<&mut Vec<CustomField>> {
        match self {
            Self::Fixed(_) => None,
            Self::Custom { fields, .. } => Some(fields),
        }
    }

    /// Label shown to users: the template name for custom shapes.
    pub fn label(&self) -> &str {
        match self {
            Self::Custom { template_name, .. } if !template_name.is_empty() => template_name,
            _ => self.code().label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_fields: Option<Vec<CustomField>>,
}

impl<C: CategoryCode> TryFrom<RawCategory> for CategoryShape<C> {
    type Error = ModelError;

    fn try_from(raw: RawCategory) -> Result<Self, Self::Error> {
        let category = C::parse(&raw.category).ok_or_else(|| ModelError::UnknownCategory {
            kind: C::KIND,
            value: raw.category.clone(),
        })?;
        if category.is_custom() {
            let template_name = raw
                .custom_category_name
                .filter(|name| !name.trim().is_empty())
                .ok_or(ModelError::MissingTemplateName(C::KIND))?;
            return Ok(Self::Custom {
                template_name,
                fields: raw.custom_fields.unwrap_or_default(),
            });
        }
        let has_fields = raw
            .custom_fields
            .as_ref()
            .is_some_and(|fields| !fields.is_empty());
        if raw.custom_category_name.is_some() || has_fields {
            return Err(ModelError::CustomDataOnFixedCategory(raw.category));
        }
        Ok(Self::Fixed(category))
    }
}

impl<C: CategoryCode> From<&CategoryShape<C>> for RawCategory {
    fn from(shape: &CategoryShape<C>) -> Self {
        match shape {
            CategoryShape::Fixed(category) => Self {
                category: category.as_str().to_owned(),
                custom_category_name: None,
                custom_fields: None,
            },
            CategoryShape::Custom {
                template_name,
                fields,
            } => Self {
                category: C::CUSTOM.as_str().to_owned(),
                custom_category_name: Some(template_name.clone()),
                custom_fields: (!fields.is_empty()).then(|| fields.clone()),
            },
        }
    }
}

impl<C: CategoryCode> Serialize for CategoryShape<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawCategory::from(self).serialize(serializer)
    }
}

impl<'de, C: CategoryCode> Deserialize<'de> for CategoryShape<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCategory::deserialize(deserializer)?;
        Self::try_from(raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: DocumentId,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// Category-specific asset attributes. Which ones a form shows depends on the category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire::date")]
    pub purchase_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire::date")]
    pub end_date: Option<Date>,
    #[serde(
        default,
        rename = "initialValue",
        skip_serializing_if = "Option::is_none",
        with = "wire::amount_opt"
    )]
    pub initial_value_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_of_return: Option<f64>,
    #[serde(
        default,
        rename = "monthlyPayment",
        skip_serializing_if = "Option::is_none",
        with = "wire::amount_opt"
    )]
    pub monthly_payment_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "documentURL", skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(flatten)]
    pub category: CategoryShape<AssetCategory>,
    #[serde(rename = "value", with = "wire::amount")]
    pub value_cents: i64,
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(flatten)]
    pub details: AssetDetails,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentRef>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Asset {
    /// Field lookup by wire name; unknown names read as null.
    pub fn field(&self, name: &str) -> Scalar {
        match name {
            "id" => Scalar::text(self.id.as_str()),
            "name" => Scalar::text(&self.name),
            "category" => Scalar::text(self.category.code().as_str()),
            "customCategoryName" => self.category.template_name().into(),
            "value" => Scalar::Number(cents_to_major(self.value_cents)),
            "owner" => Scalar::text(&self.owner),
            "notes" => non_empty(&self.notes),
            "institution" => self.details.institution.as_deref().into(),
            "accountNumber" => self.details.account_number.as_deref().into(),
            "location" => self.details.location.as_deref().into(),
            "purchaseDate" => date_scalar(self.details.purchase_date),
            "endDate" => date_scalar(self.details.end_date),
            "initialValue" => self.details.initial_value_cents.map(cents_to_major).into(),
            "rateOfReturn" => self.details.rate_of_return.into(),
            "monthlyPayment" => self.details.monthly_payment_cents.map(cents_to_major).into(),
            "description" => self.details.description.as_deref().into(),
            "documentURL" => self.details.document_url.as_deref().into(),
            "createdAt" => timestamp_scalar(self.created_at),
            "updatedAt" => timestamp_scalar(Some(self.updated_at)),
            _ => Scalar::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(flatten)]
    pub category: CategoryShape<LiabilityCategory>,
    #[serde(rename = "balance", with = "wire::amount")]
    pub balance_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire::date")]
    pub due_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Liability {
    pub fn field(&self, name: &str) -> Scalar {
        match name {
            "id" => Scalar::text(self.id.as_str()),
            "name" => Scalar::text(&self.name),
            "category" => Scalar::text(self.category.code().as_str()),
            "customCategoryName" => self.category.template_name().into(),
            "balance" => Scalar::Number(cents_to_major(self.balance_cents)),
            "interestRate" => self.interest_rate.into(),
            "dueDate" => date_scalar(self.due_date),
            "institution" => self.institution.as_deref().into(),
            "owner" => Scalar::text(&self.owner),
            "notes" => non_empty(&self.notes),
            "updatedAt" => timestamp_scalar(Some(self.updated_at)),
            _ => Scalar::Null,
        }
    }
}

pub fn cents_to_major(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn major_to_cents(value: f64) -> Option<i64> {
    let cents = (value * 100.0).round();
    if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

fn non_empty(value: &str) -> Scalar {
    if value.is_empty() {
        Scalar::Null
    } else {
        Scalar::text(value)
    }
}

fn date_scalar(date: Option<Date>) -> Scalar {
    date.map_or(Scalar::Null, |date| Scalar::Text(date.to_string()))
}

fn timestamp_scalar(at: Option<OffsetDateTime>) -> Scalar {
    at.and_then(|at| {
        at.format(&time::format_description::well_known::Rfc3339)
            .ok()
    })
    .map_or(Scalar::Null, Scalar::Text)
}

/// Serde adapters for the REST payload shapes.
pub(crate) mod wire {
    pub mod amount {
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        use crate::model::{cents_to_major, major_to_cents};

        pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
            if cents % 100 == 0 {
                serializer.serialize_i64(cents / 100)
            } else {
                serializer.serialize_f64(cents_to_major(*cents))
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
            let value = f64::deserialize(deserializer)?;
            major_to_cents(value)
                .ok_or_else(|| D::Error::custom(format!("amount {value} is out of range")))
        }
    }

    pub mod amount_opt {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            cents: &Option<i64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match cents {
                Some(cents) => super::amount::serialize(cents, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<i64>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapped(#[serde(with = "super::amount")] i64);

            Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(cents)| cents))
        }
    }

    /// Dates travel as `YYYY-MM-DD`; longer ISO timestamps are truncated to the date.
    pub mod date {
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        use crate::validation::parse_date;

        pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_str(&date.to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            let Some(raw) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let day = trimmed.get(..10).unwrap_or(trimmed);
            parse_date(day)
                .map(Some)
                .map_err(|error| D::Error::custom(format!("{error}: {raw:?}")))
        }
    }
}
