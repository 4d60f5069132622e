// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Category to form-field configuration.
//!
//! Fixed categories map to static, ordered field tables. The `custom` code and
//! template ids resolve to an empty fixed list; the form renders the record's
//! template-backed custom fields in that slot instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ids::{FieldId, TemplateId};
use crate::model::{
    AssetCategory, CategoryCode, CustomCategoryTemplate, CustomField, EntityKind,
    LiabilityCategory, Scalar,
};
use crate::validation::{
    ValidationResult, check_bounds, parse_date, parse_number, validate_email, validate_phone,
    validate_url,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldConfigError {
    #[error("unrecognized {kind} category {value:?}")]
    UnrecognizedCategory { kind: EntityKind, value: String },
    #[error("custom category template {0} is not loaded")]
    UnknownTemplate(TemplateId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Currency,
    Percentage,
    Textarea,
    Email,
    Url,
    #[serde(alias = "phone")]
    Tel,
}

/// What a field's value looks like once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Numeric,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InputBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl FieldType {
    /// Offered to users when authoring a custom category.
    pub const ALL: [Self; 9] = [
        Self::Text,
        Self::Number,
        Self::Currency,
        Self::Date,
        Self::Url,
        Self::Email,
        Self::Tel,
        Self::Textarea,
        Self::Percentage,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Currency => "currency",
            Self::Percentage => "percentage",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            "currency" => Some(Self::Currency),
            "percentage" => Some(Self::Percentage),
            "textarea" => Some(Self::Textarea),
            "email" => Some(Self::Email),
            "url" => Some(Self::Url),
            "tel" | "phone" => Some(Self::Tel),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Date => "Date",
            Self::Currency => "Currency",
            Self::Percentage => "Percentage",
            Self::Textarea => "Long Text",
            Self::Email => "Email",
            Self::Url => "URL",
            Self::Tel => "Phone",
        }
    }

    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Number | Self::Currency | Self::Percentage => ValueKind::Numeric,
            Self::Date => ValueKind::Date,
            Self::Text | Self::Textarea | Self::Email | Self::Url | Self::Tel => ValueKind::Text,
        }
    }

    pub const fn default_bounds(self) -> InputBounds {
        match self {
            Self::Currency => InputBounds {
                min: Some(0.0),
                max: None,
                step: Some(0.01),
            },
            Self::Percentage => InputBounds {
                min: Some(0.0),
                max: Some(100.0),
                step: Some(0.1),
            },
            _ => InputBounds {
                min: None,
                max: None,
                step: None,
            },
        }
    }

    /// Parses raw input into a cell value. Blank input is `Null`.
    pub fn parse_value(self, input: &str) -> ValidationResult<Scalar> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Scalar::Null);
        }
        let bounds = self.default_bounds();
        match self {
            Self::Number | Self::Currency | Self::Percentage => {
                let value = check_bounds(parse_number(trimmed)?, bounds.min, bounds.max)?;
                Ok(Scalar::Number(value))
            }
            Self::Date => Ok(Scalar::Text(parse_date(trimmed)?.to_string())),
            Self::Email => {
                validate_email(trimmed)?;
                Ok(Scalar::text(trimmed))
            }
            Self::Url => {
                validate_url(trimmed)?;
                Ok(Scalar::text(trimmed))
            }
            Self::Tel => {
                validate_phone(trimmed)?;
                Ok(Scalar::text(trimmed))
            }
            Self::Text | Self::Textarea => Ok(Scalar::text(trimmed)),
        }
    }

    /// Checks an already-stored value against this type.
    pub fn check_value(self, value: &Scalar) -> ValidationResult<()> {
        match value {
            Scalar::Null => Ok(()),
            Scalar::Number(number) if self.value_kind() == ValueKind::Numeric => {
                let bounds = self.default_bounds();
                check_bounds(*number, bounds.min, bounds.max).map(|_| ())
            }
            Scalar::Number(_) => Ok(()),
            Scalar::Text(text) => self.parse_value(text).map(|_| ()),
        }
    }
}

/// One form field of a fixed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub field_name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: &'static str,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub placeholder: Option<&'static str>,
    pub helper_text: Option<&'static str>,
    pub min_rows: Option<u8>,
}

impl FieldDefinition {
    const fn new(field_name: &'static str, field_type: FieldType, label: &'static str) -> Self {
        let bounds = field_type.default_bounds();
        Self {
            field_name,
            field_type,
            label,
            required: false,
            min: bounds.min,
            max: bounds.max,
            step: bounds.step,
            placeholder: None,
            helper_text: None,
            min_rows: None,
        }
    }

    const fn text(field_name: &'static str, label: &'static str) -> Self {
        Self::new(field_name, FieldType::Text, label)
    }

    const fn date(field_name: &'static str, label: &'static str) -> Self {
        Self::new(field_name, FieldType::Date, label)
    }

    const fn currency(field_name: &'static str, label: &'static str) -> Self {
        Self::new(field_name, FieldType::Currency, label)
    }

    const fn percentage(field_name: &'static str, label: &'static str) -> Self {
        Self::new(field_name, FieldType::Percentage, label)
    }

    const fn textarea(field_name: &'static str, label: &'static str, min_rows: u8) -> Self {
        Self {
            min_rows: Some(min_rows),
            ..Self::new(field_name, FieldType::Textarea, label)
        }
    }

    const fn document_url(helper_text: &'static str) -> Self {
        Self::new("documentURL", FieldType::Url, "Document URL")
            .placeholder("https://")
            .helper(helper_text)
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn placeholder(self, placeholder: &'static str) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..self
        }
    }

    const fn helper(self, helper_text: &'static str) -> Self {
        Self {
            helper_text: Some(helper_text),
            ..self
        }
    }
}

const LAND_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::text("location", "Location")
        .placeholder("Enter location (e.g., Salem, Tamil Nadu)")
        .helper("Physical location of the land"),
    FieldDefinition::date("purchaseDate", "Purchase Date").helper("When the land was purchased"),
    FieldDefinition::currency("initialValue", "Purchase Price")
        .placeholder("Enter purchase price")
        .helper("Original purchase price to track gains/losses"),
    FieldDefinition::textarea("description", "Description", 3)
        .placeholder("Enter details about the land")
        .helper("Survey number, dimensions, or other details"),
    FieldDefinition::document_url("Link to property documents or deeds"),
];

const PROPERTY_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::text("location", "Location")
        .placeholder("Enter property address")
        .helper("Full address of the property"),
    FieldDefinition::date("purchaseDate", "Purchase Date")
        .helper("When the property was purchased"),
    FieldDefinition::currency("initialValue", "Purchase Price")
        .placeholder("Enter purchase price")
        .helper("Original purchase price"),
    FieldDefinition::textarea("description", "Description", 3)
        .placeholder("Enter property details")
        .helper("Property type, size, features, etc."),
    FieldDefinition::document_url("Link to property documents"),
];

const GOLD_FIELDS: &[FieldDefinition] = &[FieldDefinition::document_url(
    "Link to purchase receipts or certificates",
)];

const GOLD_SCHEME_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::text("institution", "Jeweler/Institution")
        .placeholder("Enter jeweler or bank name")
        .helper("Name of the jeweler or institution"),
    FieldDefinition::date("purchaseDate", "Scheme Start Date").helper("When the scheme started"),
    FieldDefinition::date("endDate", "Maturity Date").helper("When the scheme matures"),
    FieldDefinition::currency("initialValue", "Down Payment")
        .placeholder("Enter initial payment")
        .helper("Initial amount paid"),
    FieldDefinition::currency("monthlyPayment", "Monthly Payment")
        .placeholder("Enter monthly amount")
        .helper("Monthly installment amount"),
    FieldDefinition::document_url("Link to scheme documents"),
];

const LENT_MONEY_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::date("purchaseDate", "Loan Date").helper("When the money was lent"),
    FieldDefinition::date("endDate", "Return Date").helper("Expected return date"),
    FieldDefinition::currency("initialValue", "Loan Amount")
        .placeholder("Enter loan amount")
        .helper("Principal amount lent"),
    FieldDefinition::percentage("rateOfReturn", "Interest Rate")
        .placeholder("Enter interest rate")
        .helper("Annual interest rate (if any)"),
    FieldDefinition::textarea("description", "Borrower Details", 2)
        .placeholder("Enter borrower name and details")
        .helper("Name and contact of the borrower"),
    FieldDefinition::document_url("Link to loan agreement or promissory note"),
];

const SAVINGS_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::text("institution", "Bank Name")
        .placeholder("Enter bank name")
        .helper("Name of the bank"),
    FieldDefinition::text("accountNumber", "Account Number")
        .placeholder("Enter account number")
        .helper("Bank account number"),
    FieldDefinition::document_url("Link to bank statements"),
];

const FIXED_DEPOSIT_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::text("institution", "Bank/Institution")
        .placeholder("Enter bank name")
        .helper("Name of the bank or financial institution"),
    FieldDefinition::text("accountNumber", "FD Number")
        .placeholder("Enter FD account number")
        .helper("Fixed deposit account number"),
    FieldDefinition::date("purchaseDate", "Start Date").helper("FD start date"),
    FieldDefinition::date("endDate", "Maturity Date").helper("FD maturity date"),
    FieldDefinition::currency("initialValue", "Principal Amount")
        .placeholder("Enter deposit amount")
        .helper("Amount deposited"),
    FieldDefinition::percentage("rateOfReturn", "Interest Rate")
        .placeholder("Enter interest rate")
        .helper("Annual interest rate"),
    FieldDefinition::document_url("Link to FD certificate"),
];

const INVESTMENT_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::text("institution", "Broker/Platform")
        .placeholder("Enter broker or platform name")
        .helper("Trading platform or broker name"),
    FieldDefinition::text("accountNumber", "Account Number")
        .placeholder("Enter account or folio number")
        .helper("Demat account or folio number"),
    FieldDefinition::currency("initialValue", "Investment Amount")
        .placeholder("Enter initial investment")
        .helper("Initial amount invested"),
    FieldDefinition::percentage("rateOfReturn", "Expected Return")
        .placeholder("Enter expected return %")
        .helper("Expected annual return"),
    FieldDefinition::document_url("Link to investment statements"),
];

const RETIREMENT_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::text("institution", "Institution")
        .placeholder("Enter institution name")
        .helper("EPF, PPF, NPS provider name"),
    FieldDefinition::text("accountNumber", "Account Number")
        .placeholder("Enter account number")
        .helper("Retirement account number"),
    FieldDefinition::document_url("Link to statements"),
];

const OTHER_ASSET_FIELDS: &[FieldDefinition] =
    &[FieldDefinition::document_url("Link to related documents")];

const LIABILITY_INSTITUTION: FieldDefinition = FieldDefinition::text("institution", "Institution")
    .placeholder("Enter institution name")
    .helper("Bank or financial institution name");

const LIABILITY_DUE_DATE: FieldDefinition =
    FieldDefinition::date("dueDate", "Due Date").helper("Next payment due date");

const LIABILITY_INTEREST_RATE: FieldDefinition =
    FieldDefinition::percentage("interestRate", "Interest Rate (%)")
        .placeholder("Enter interest rate")
        .helper("Annual interest rate (optional)");

const LENDER_FIELDS: &[FieldDefinition] = &[
    LIABILITY_INSTITUTION,
    LIABILITY_DUE_DATE,
    LIABILITY_INTEREST_RATE,
];

const DUE_DATE_ONLY: &[FieldDefinition] = &[LIABILITY_DUE_DATE];

pub fn asset_category_fields(category: AssetCategory) -> &'static [FieldDefinition] {
    match category {
        AssetCategory::Land => LAND_FIELDS,
        AssetCategory::Gold => GOLD_FIELDS,
        AssetCategory::GoldScheme => GOLD_SCHEME_FIELDS,
        AssetCategory::LentMoney => LENT_MONEY_FIELDS,
        AssetCategory::Savings => SAVINGS_FIELDS,
        AssetCategory::FixedDeposit => FIXED_DEPOSIT_FIELDS,
        AssetCategory::Investment => INVESTMENT_FIELDS,
        AssetCategory::Property => PROPERTY_FIELDS,
        AssetCategory::Retirement => RETIREMENT_FIELDS,
        AssetCategory::Other => OTHER_ASSET_FIELDS,
        AssetCategory::Custom => &[],
    }
}

pub fn liability_category_fields(category: LiabilityCategory) -> &'static [FieldDefinition] {
    match category {
        LiabilityCategory::Credit | LiabilityCategory::Loan | LiabilityCategory::Mortgage => {
            LENDER_FIELDS
        }
        LiabilityCategory::Tax | LiabilityCategory::Other => DUE_DATE_ONLY,
        LiabilityCategory::Custom => &[],
    }
}

const ASSET_TOP: &[FieldDefinition] = &[FieldDefinition::text("name", "Asset Name")
    .required()
    .placeholder("Enter asset name")
    .helper("A descriptive name for this asset")];

static ASSET_VALUE: FieldDefinition = FieldDefinition::currency("value", "Current Value")
    .required()
    .placeholder("Enter current value")
    .helper("Current market value or balance");

const ASSET_BOTTOM: &[FieldDefinition] = &[
    FieldDefinition::text("owner", "Owner")
        .required()
        .placeholder("Enter owner name")
        .helper("Who owns this asset"),
    FieldDefinition::textarea("notes", "Additional Notes", 2)
        .placeholder("Enter any additional notes")
        .helper("Any other relevant information"),
];

const LIABILITY_TOP: &[FieldDefinition] = &[FieldDefinition::text("name", "Liability Name")
    .required()
    .placeholder("Enter liability name")
    .helper("A descriptive name for this liability")];

static LIABILITY_VALUE: FieldDefinition = FieldDefinition::currency("balance", "Outstanding Balance")
    .required()
    .placeholder("Enter current balance")
    .helper("Current outstanding amount");

const LIABILITY_BOTTOM: &[FieldDefinition] = &[
    FieldDefinition::text("owner", "Owner")
        .required()
        .placeholder("Enter owner name")
        .helper("Who is responsible for this liability"),
    FieldDefinition::textarea("notes", "Additional Notes", 2)
        .placeholder("Enter any additional details")
        .helper("Payment schedule, terms, reminders, etc."),
];

/// Result of resolving a category selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedFields<'a> {
    Fixed(&'static [FieldDefinition]),
    /// Category-specific fields are replaced by the record's custom fields.
    /// `template` is set when the selection named a loaded template.
    Custom {
        template: Option<&'a CustomCategoryTemplate>,
    },
}

impl<'a> ResolvedFields<'a> {
    pub fn definitions(&self) -> &'static [FieldDefinition] {
        match self {
            Self::Fixed(definitions) => definitions,
            Self::Custom { .. } => &[],
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    pub fn template(&self) -> Option<&'a CustomCategoryTemplate> {
        match self {
            Self::Fixed(_) => None,
            Self::Custom { template } => *template,
        }
    }
}

/// Resolves a category code, the `custom` sentinel, or a loaded template id
/// of the same kind into the category-specific field list.
pub fn resolve_fields<'a>(
    kind: EntityKind,
    category: &str,
    templates: &'a [CustomCategoryTemplate],
) -> Result<ResolvedFields<'a>, FieldConfigError> {
    let fixed = match kind {
        EntityKind::Asset => AssetCategory::parse(category).map(|code| {
            (code.is_custom(), asset_category_fields(code))
        }),
        EntityKind::Liability => LiabilityCategory::parse(category).map(|code| {
            (code.is_custom(), liability_category_fields(code))
        }),
    };

    let resolved = match fixed {
        Some((true, _)) => ResolvedFields::Custom { template: None },
        Some((false, definitions)) => ResolvedFields::Fixed(definitions),
        None => {
            let template = templates
                .iter()
                .find(|template| template.category_type == kind && template.id.as_str() == category)
                .ok_or_else(|| FieldConfigError::UnrecognizedCategory {
                    kind,
                    value: category.to_owned(),
                })?;
            ResolvedFields::Custom {
                template: Some(template),
            }
        }
    };
    debug!(
        %kind,
        category,
        custom = resolved.is_custom(),
        fields = resolved.definitions().len(),
        "resolved category fields"
    );
    Ok(resolved)
}

/// One render position in a form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormSlot<'a> {
    Field(&'a FieldDefinition),
    CustomFields(Option<&'a CustomCategoryTemplate>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormStructure<'a> {
    pub kind: EntityKind,
    pub top_fields: &'static [FieldDefinition],
    pub category_fields: ResolvedFields<'a>,
    pub value_field: &'static FieldDefinition,
    pub bottom_fields: &'static [FieldDefinition],
}

impl<'a> FormStructure<'a> {
    /// Render order: top, category (or custom fields), value, bottom.
    pub fn slots(&self) -> Vec<FormSlot<'a>> {
        let mut slots = self
            .top_fields
            .iter()
            .map(FormSlot::Field)
            .collect::<Vec<_>>();
        match self.category_fields {
            ResolvedFields::Fixed(definitions) => {
                slots.extend(definitions.iter().map(FormSlot::Field));
            }
            ResolvedFields::Custom { template } => slots.push(FormSlot::CustomFields(template)),
        }
        slots.push(FormSlot::Field(self.value_field));
        slots.extend(self.bottom_fields.iter().map(FormSlot::Field));
        slots
    }

    /// Every fixed field name in render order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.top_fields
            .iter()
            .chain(self.category_fields.definitions())
            .chain(std::iter::once(self.value_field))
            .chain(self.bottom_fields)
            .map(|definition| definition.field_name)
            .collect()
    }
}

pub fn build_form_structure(kind: EntityKind, category_fields: ResolvedFields<'_>) -> FormStructure<'_> {
    let (top_fields, value_field, bottom_fields) = match kind {
        EntityKind::Asset => (ASSET_TOP, &ASSET_VALUE, ASSET_BOTTOM),
        EntityKind::Liability => (LIABILITY_TOP, &LIABILITY_VALUE, LIABILITY_BOTTOM),
    };
    FormStructure {
        kind,
        top_fields,
        category_fields,
        value_field,
        bottom_fields,
    }
}

/// Fresh, independent field instances for a record: new ids, empty values.
pub fn materialize_custom_fields(template: &CustomCategoryTemplate) -> Vec<CustomField> {
    template
        .fields
        .iter()
        .map(|field| CustomField {
            id: FieldId::generate(),
            name: field.name.clone(),
            field_type: field.field_type,
            value: Scalar::Null,
            required: field.required,
            placeholder: field.placeholder.clone(),
        })
        .collect()
}

/// Locates the template a custom record was built from, by case-insensitive name.
pub fn find_template_for_record<'a>(
    templates: &'a [CustomCategoryTemplate],
    kind: EntityKind,
    custom_category_name: &str,
) -> Option<&'a CustomCategoryTemplate> {
    let wanted = custom_category_name.trim().to_lowercase();
    templates
        .iter()
        .find(|template| template.category_type == kind && template.name.to_lowercase() == wanted)
}

pub fn select_template<'a>(
    templates: &'a [CustomCategoryTemplate],
    id: &TemplateId,
) -> Result<&'a CustomCategoryTemplate, FieldConfigError> {
    templates
        .iter()
        .find(|template| &template.id == id)
        .ok_or_else(|| FieldConfigError::UnknownTemplate(id.clone()))
}
