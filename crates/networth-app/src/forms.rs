// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use time::OffsetDateTime;

use crate::fields::{
    FieldType, ResolvedFields, find_template_for_record, materialize_custom_fields, resolve_fields,
};
use crate::ids::{FieldId, RecordId, TemplateId};
use crate::model::{
    Asset, AssetCategory, AssetDetails, CategoryCode, CategoryShape, CustomCategoryTemplate,
    CustomField, CustomFieldTemplate, DocumentRef, EntityKind, Liability, LiabilityCategory,
    Scalar,
};
use crate::validation::{check_bounds, validate_url};

#[derive(Debug, Clone, PartialEq)]
pub struct AssetFormInput {
    pub name: String,
    pub category: CategoryShape<AssetCategory>,
    pub value_cents: i64,
    pub owner: String,
    pub notes: String,
    pub details: AssetDetails,
    pub documents: Vec<DocumentRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiabilityFormInput {
    pub name: String,
    pub category: CategoryShape<LiabilityCategory>,
    pub balance_cents: i64,
    pub interest_rate: Option<f64>,
    pub due_date: Option<time::Date>,
    pub institution: Option<String>,
    pub owner: String,
    pub notes: String,
}

/// Draft of one field while authoring a custom category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldDraft {
    pub id: Option<FieldId>,
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCategoryFormInput {
    pub name: String,
    pub category_type: EntityKind,
    pub description: String,
    pub icon: Option<String>,
    pub fields: Vec<CustomFieldDraft>,
}

impl AssetFormInput {
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            category: CategoryShape::Fixed(AssetCategory::OPTIONS[0]),
            value_cents: 0,
            owner: String::new(),
            notes: String::new(),
            details: AssetDetails::default(),
            documents: Vec::new(),
        }
    }

    /// Prefills an edit form from a stored asset.
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            name: asset.name.clone(),
            category: asset.category.clone(),
            value_cents: asset.value_cents,
            owner: asset.owner.clone(),
            notes: asset.notes.clone(),
            details: asset.details.clone(),
            documents: asset.documents.clone(),
        }
    }

    /// Switches category from a selector value: a fixed code or a template id.
    pub fn select_category(
        &mut self,
        selection: &str,
        templates: &[CustomCategoryTemplate],
    ) -> Result<()> {
        self.category = select_shape(EntityKind::Asset, selection, templates)?;
        Ok(())
    }

    /// Template the current custom shape was built from, when still loaded.
    pub fn selected_template<'a>(
        &self,
        templates: &'a [CustomCategoryTemplate],
    ) -> Option<&'a CustomCategoryTemplate> {
        let name = self.category.template_name()?;
        find_template_for_record(templates, EntityKind::Asset, name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("asset name is required -- enter a name and retry");
        }
        if self.owner.trim().is_empty() {
            bail!("asset owner is required -- enter an owner and retry");
        }
        if self.value_cents <= 0 {
            bail!("asset value must be greater than 0");
        }
        validate_custom_shape(&self.category)?;

        let details = &self.details;
        for cents in [details.initial_value_cents, details.monthly_payment_cents]
            .into_iter()
            .flatten()
        {
            if cents < 0 {
                bail!("asset amounts cannot be negative");
            }
        }
        if let Some(rate) = details.rate_of_return {
            check_bounds(rate, Some(0.0), Some(100.0)).context("asset rate of return")?;
        }
        if let (Some(start), Some(end)) = (details.purchase_date, details.end_date)
            && end < start
        {
            bail!("asset end date must be on/after the start date");
        }
        if let Some(url) = details.document_url.as_deref().filter(|url| !url.trim().is_empty()) {
            validate_url(url).context("asset document URL")?;
        }
        Ok(())
    }

    pub fn into_asset(self, id: RecordId, now: OffsetDateTime) -> Result<Asset> {
        self.validate()?;
        Ok(Asset {
            id,
            name: self.name.trim().to_owned(),
            category: self.category,
            value_cents: self.value_cents,
            owner: self.owner.trim().to_owned(),
            notes: self.notes,
            details: self.details,
            documents: self.documents,
            created_at: Some(now),
            updated_at: now,
        })
    }

    /// Replaces every mutable field of `asset`; id and creation time stay.
    pub fn apply_to(self, asset: &mut Asset, now: OffsetDateTime) -> Result<()> {
        self.validate()?;
        asset.name = self.name.trim().to_owned();
        asset.category = self.category;
        asset.value_cents = self.value_cents;
        asset.owner = self.owner.trim().to_owned();
        asset.notes = self.notes;
        asset.details = self.details;
        asset.documents = self.documents;
        asset.updated_at = now;
        Ok(())
    }
}

impl LiabilityFormInput {
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            category: CategoryShape::Fixed(LiabilityCategory::OPTIONS[0]),
            balance_cents: 0,
            interest_rate: None,
            due_date: None,
            institution: None,
            owner: String::new(),
            notes: String::new(),
        }
    }

    pub fn from_liability(liability: &Liability) -> Self {
        Self {
            name: liability.name.clone(),
            category: liability.category.clone(),
            balance_cents: liability.balance_cents,
            interest_rate: liability.interest_rate,
            due_date: liability.due_date,
            institution: liability.institution.clone(),
            owner: liability.owner.clone(),
            notes: liability.notes.clone(),
        }
    }

    pub fn select_category(
        &mut self,
        selection: &str,
        templates: &[CustomCategoryTemplate],
    ) -> Result<()> {
        self.category = select_shape(EntityKind::Liability, selection, templates)?;
        Ok(())
    }

    pub fn selected_template<'a>(
        &self,
        templates: &'a [CustomCategoryTemplate],
    ) -> Option<&'a CustomCategoryTemplate> {
        let name = self.category.template_name()?;
        find_template_for_record(templates, EntityKind::Liability, name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("liability name is required -- enter a name and retry");
        }
        if self.owner.trim().is_empty() {
            bail!("liability owner is required -- enter an owner and retry");
        }
        if self.balance_cents <= 0 {
            bail!("liability balance must be greater than 0");
        }
        if let Some(rate) = self.interest_rate {
            if rate < 0.0 {
                bail!("liability interest rate cannot be negative");
            }
            check_bounds(rate, Some(0.0), Some(100.0)).context("liability interest rate")?;
        }
        validate_custom_shape(&self.category)
    }

    pub fn into_liability(self, id: RecordId, now: OffsetDateTime) -> Result<Liability> {
        self.validate()?;
        Ok(Liability {
            id,
            name: self.name.trim().to_owned(),
            category: self.category,
            balance_cents: self.balance_cents,
            interest_rate: self.interest_rate,
            due_date: self.due_date,
            institution: self.institution.filter(|name| !name.trim().is_empty()),
            owner: self.owner.trim().to_owned(),
            notes: self.notes,
            updated_at: now,
        })
    }

    pub fn apply_to(self, liability: &mut Liability, now: OffsetDateTime) -> Result<()> {
        self.validate()?;
        liability.name = self.name.trim().to_owned();
        liability.category = self.category;
        liability.balance_cents = self.balance_cents;
        liability.interest_rate = self.interest_rate;
        liability.due_date = self.due_date;
        liability.institution = self.institution.filter(|name| !name.trim().is_empty());
        liability.owner = self.owner.trim().to_owned();
        liability.notes = self.notes;
        liability.updated_at = now;
        Ok(())
    }
}

impl CustomCategoryFormInput {
    pub fn blank(category_type: EntityKind) -> Self {
        Self {
            name: String::new(),
            category_type,
            description: String::new(),
            icon: None,
            fields: Vec::new(),
        }
    }

    pub fn from_template(template: &CustomCategoryTemplate) -> Self {
        Self {
            name: template.name.clone(),
            category_type: template.category_type,
            description: template.description.clone().unwrap_or_default(),
            icon: template.icon.clone(),
            fields: template
                .fields
                .iter()
                .map(|field| CustomFieldDraft {
                    id: Some(field.id.clone()),
                    name: field.name.clone(),
                    field_type: field.field_type,
                    required: field.required,
                    placeholder: field.placeholder.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Validates the draft and produces the template to persist.
    ///
    /// `existing` is the loaded template set; `editing` names the template
    /// being replaced, whose id and creation time carry over.
    pub fn validate_and_build(
        &self,
        existing: &[CustomCategoryTemplate],
        editing: Option<&TemplateId>,
        now: OffsetDateTime,
    ) -> Result<CustomCategoryTemplate> {
        let name = self.name.trim();
        if name.is_empty() {
            bail!("category name is required -- enter a name and retry");
        }
        if self.fields.is_empty() {
            bail!("custom category needs at least one field -- add a field and retry");
        }
        if let Some(position) = self.fields.iter().position(|field| field.name.trim().is_empty()) {
            bail!(
                "every field must have a name -- name field {} and retry",
                position + 1
            );
        }

        let lowered = name.to_lowercase();
        let clash = existing.iter().any(|template| {
            template.category_type == self.category_type
                && template.name.to_lowercase() == lowered
                && Some(&template.id) != editing
        });
        if clash {
            bail!(
                "a {} category named {name:?} already exists -- choose another name",
                self.category_type
            );
        }

        let previous = match editing {
            Some(id) => Some(
                existing
                    .iter()
                    .find(|template| &template.id == id)
                    .with_context(|| format!("template {id} is not loaded"))?,
            ),
            None => None,
        };

        let description = self.description.trim();
        Ok(CustomCategoryTemplate {
            id: previous.map_or_else(TemplateId::generate, |template| template.id.clone()),
            name: name.to_owned(),
            category_type: self.category_type,
            description: (!description.is_empty()).then(|| description.to_owned()),
            icon: self.icon.clone(),
            fields: self
                .fields
                .iter()
                .map(|field| {
                    let placeholder = field.placeholder.trim();
                    CustomFieldTemplate {
                        id: field.id.clone().unwrap_or_else(FieldId::generate),
                        name: field.name.trim().to_owned(),
                        field_type: field.field_type,
                        required: field.required,
                        placeholder: (!placeholder.is_empty()).then(|| placeholder.to_owned()),
                    }
                })
                .collect(),
            created_at: previous.map_or(now, |template| template.created_at),
            updated_at: now,
        })
    }
}

fn select_shape<C: CategoryCode>(
    kind: EntityKind,
    selection: &str,
    templates: &[CustomCategoryTemplate],
) -> Result<CategoryShape<C>> {
    let resolved = resolve_fields(kind, selection, templates)?;
    match resolved {
        ResolvedFields::Fixed(_) => {
            let code = C::parse(selection)
                .with_context(|| format!("{selection:?} is not a fixed {kind} category"))?;
            Ok(CategoryShape::fixed(code)?)
        }
        ResolvedFields::Custom {
            template: Some(template),
        } => Ok(CategoryShape::Custom {
            template_name: template.name.clone(),
            fields: materialize_custom_fields(template),
        }),
        ResolvedFields::Custom { template: None } => {
            bail!("custom {kind} categories need a template -- choose one of your custom categories")
        }
    }
}

fn validate_custom_shape<C: CategoryCode>(shape: &CategoryShape<C>) -> Result<()> {
    let CategoryShape::Custom {
        template_name,
        fields,
    } = shape
    else {
        return Ok(());
    };
    if template_name.trim().is_empty() {
        bail!("custom category is required -- choose a custom category and retry");
    }
    for field in fields {
        validate_custom_field(field)?;
    }
    Ok(())
}

fn validate_custom_field(field: &CustomField) -> Result<()> {
    let blank = match &field.value {
        Scalar::Null => true,
        Scalar::Text(text) => text.trim().is_empty(),
        Scalar::Number(_) => false,
    };
    if blank {
        if field.required {
            bail!("{} is required -- enter a value and retry", field.name);
        }
        return Ok(());
    }
    field
        .field_type
        .check_value(&field.value)
        .with_context(|| format!("{} has an invalid {} value", field.name, field.field_type.as_str()))
}

#[cfg(test)]
mod tests {
    use super::{AssetFormInput, CustomCategoryFormInput, CustomFieldDraft, LiabilityFormInput};
    use crate::fields::FieldType;
    use crate::ids::{FieldId, RecordId, TemplateId};
    use crate::model::{
        AssetCategory, CategoryShape, CustomCategoryTemplate, CustomFieldTemplate, EntityKind,
        LiabilityCategory, Scalar,
    };
    use anyhow::Result;
    use time::macros::{date, datetime};

    fn templates() -> Vec<CustomCategoryTemplate> {
        vec![CustomCategoryTemplate {
            id: TemplateId::new("tpl-art"),
            name: "Artwork".to_owned(),
            category_type: EntityKind::Asset,
            description: None,
            icon: None,
            fields: vec![CustomFieldTemplate {
                id: FieldId::new("f-artist"),
                name: "Artist".to_owned(),
                field_type: FieldType::Text,
                required: true,
                placeholder: None,
            }],
            created_at: datetime!(2026-02-01 0:00 UTC),
            updated_at: datetime!(2026-02-01 0:00 UTC),
        }]
    }

    fn valid_asset() -> AssetFormInput {
        AssetFormInput {
            name: " Tanishq chain ".to_owned(),
            owner: "Meena".to_owned(),
            value_cents: 45_000_00,
            category: CategoryShape::Fixed(AssetCategory::Gold),
            ..AssetFormInput::blank()
        }
    }

    #[test]
    fn blank_forms_start_on_first_option() {
        assert_eq!(
            AssetFormInput::blank().category,
            CategoryShape::Fixed(AssetCategory::Savings)
        );
        assert_eq!(
            LiabilityFormInput::blank().category,
            CategoryShape::Fixed(LiabilityCategory::Credit)
        );
    }

    #[test]
    fn asset_validation_requires_name_owner_and_value() {
        let mut form = valid_asset();
        assert!(form.validate().is_ok());

        form.name = "   ".to_owned();
        let error = form.validate().expect_err("blank name should fail");
        assert!(error.to_string().contains("name is required"));

        let form = AssetFormInput {
            owner: String::new(),
            ..valid_asset()
        };
        assert!(form.validate().is_err());

        let form = AssetFormInput {
            value_cents: 0,
            ..valid_asset()
        };
        let error = form.validate().expect_err("zero value should fail");
        assert!(error.to_string().contains("greater than 0"));
    }

    #[test]
    fn asset_validation_checks_details() {
        let mut form = valid_asset();
        form.details.rate_of_return = Some(140.0);
        assert!(form.validate().is_err());

        let mut form = valid_asset();
        form.details.purchase_date = Some(date!(2025 - 06 - 01));
        form.details.end_date = Some(date!(2025 - 01 - 01));
        assert!(form.validate().is_err());

        let mut form = valid_asset();
        form.details.document_url = Some("not a url".to_owned());
        assert!(form.validate().is_err());
    }

    #[test]
    fn selecting_template_materializes_fields() -> Result<()> {
        let templates = templates();
        let mut form = valid_asset();
        form.select_category("tpl-art", &templates)?;

        assert_eq!(form.category.template_name(), Some("Artwork"));
        assert_eq!(form.category.custom_fields().len(), 1);
        assert_eq!(form.category.custom_fields()[0].value, Scalar::Null);
        assert!(form.selected_template(&templates).is_some());

        let error = form.validate().expect_err("required custom field is empty");
        assert!(error.to_string().contains("Artist is required"));

        if let Some(fields) = form.category.custom_fields_mut() {
            fields[0].value = Scalar::text("Raja Ravi Varma");
        }
        form.validate()?;

        form.select_category("land", &templates)?;
        assert_eq!(form.category, CategoryShape::Fixed(AssetCategory::Land));
        Ok(())
    }

    #[test]
    fn bare_custom_and_unknown_selections_fail() {
        let templates = templates();
        let mut form = valid_asset();
        assert!(form.select_category("custom", &templates).is_err());
        assert!(form.select_category("tpl-missing", &templates).is_err());
        assert_eq!(form.category, CategoryShape::Fixed(AssetCategory::Gold));
    }

    #[test]
    fn into_and_apply_refresh_timestamps() -> Result<()> {
        let created = datetime!(2026-03-01 10:00 UTC);
        let mut asset = valid_asset().into_asset(RecordId::provisional(), created)?;
        assert_eq!(asset.name, "Tanishq chain");
        assert_eq!(asset.created_at, Some(created));
        assert!(asset.id.is_provisional());

        let edited = datetime!(2026-03-05 08:30 UTC);
        let mut form = AssetFormInput::from_asset(&asset);
        form.value_cents = 47_500_00;
        form.apply_to(&mut asset, edited)?;
        assert_eq!(asset.value_cents, 47_500_00);
        assert_eq!(asset.updated_at, edited);
        assert_eq!(asset.created_at, Some(created));
        Ok(())
    }

    #[test]
    fn liability_rejects_negative_rate() -> Result<()> {
        let form = LiabilityFormInput {
            name: "Home loan".to_owned(),
            owner: "Karthik".to_owned(),
            balance_cents: 32_00_000_00,
            interest_rate: Some(-1.0),
            ..LiabilityFormInput::blank()
        };
        let error = form.validate().expect_err("negative rate should fail");
        assert!(error.to_string().contains("cannot be negative"));

        let liability = LiabilityFormInput {
            interest_rate: Some(8.4),
            institution: Some("  ".to_owned()),
            ..form
        }
        .into_liability(RecordId::new("l-1"), datetime!(2026-03-01 0:00 UTC))?;
        assert_eq!(liability.institution, None);
        Ok(())
    }

    #[test]
    fn custom_category_form_sanitizes_fields() -> Result<()> {
        let form = CustomCategoryFormInput {
            name: "  Vehicle ".to_owned(),
            description: "   ".to_owned(),
            fields: vec![CustomFieldDraft {
                id: None,
                name: " Registration ".to_owned(),
                field_type: FieldType::Text,
                required: true,
                placeholder: "  ".to_owned(),
            }],
            ..CustomCategoryFormInput::blank(EntityKind::Asset)
        };
        let template = form.validate_and_build(&templates(), None, datetime!(2026-03-01 0:00 UTC))?;
        assert_eq!(template.name, "Vehicle");
        assert_eq!(template.description, None);
        assert_eq!(template.fields[0].name, "Registration");
        assert_eq!(template.fields[0].placeholder, None);
        assert!(template.fields[0].id.as_str().starts_with("field-"));
        Ok(())
    }

    #[test]
    fn custom_category_form_rejects_incomplete_drafts() {
        let now = datetime!(2026-03-01 0:00 UTC);
        let empty = CustomCategoryFormInput {
            name: "Vehicle".to_owned(),
            ..CustomCategoryFormInput::blank(EntityKind::Asset)
        };
        let error = empty
            .validate_and_build(&[], None, now)
            .expect_err("no fields should fail");
        assert!(error.to_string().contains("at least one field"));

        let unnamed = CustomCategoryFormInput {
            fields: vec![CustomFieldDraft {
                id: None,
                name: " ".to_owned(),
                field_type: FieldType::Number,
                required: false,
                placeholder: String::new(),
            }],
            ..empty.clone()
        };
        let error = unnamed
            .validate_and_build(&[], None, now)
            .expect_err("unnamed field should fail");
        assert!(error.to_string().contains("name field 1"));

        let duplicate = CustomCategoryFormInput {
            name: "artwork".to_owned(),
            fields: vec![CustomFieldDraft {
                name: "Artist".to_owned(),
                ..unnamed.fields[0].clone()
            }],
            ..empty
        };
        assert!(duplicate.validate_and_build(&templates(), None, now).is_err());
        assert!(
            duplicate
                .validate_and_build(&templates(), Some(&TemplateId::new("tpl-art")), now)
                .is_ok()
        );
    }
}
