// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use networth_app::{
    Asset, AssetCategory, AssetDetails, CategoryShape, CustomCategoryTemplate,
    CustomFieldTemplate, EntityKind, FieldId, FieldType, Liability, LiabilityCategory, RecordId,
    Scalar, TemplateId, materialize_custom_fields,
};
use std::path::PathBuf;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const REFERENCE_YEAR: i32 = 2026;

const OWNERS: [&str; 8] = [
    "Priya", "Arun", "Meena", "Karthik", "Lakshmi", "Vijay", "Divya", "Suresh",
];

const BANKS: [&str; 8] = [
    "HDFC Bank",
    "State Bank of India",
    "ICICI Bank",
    "Axis Bank",
    "Canara Bank",
    "Indian Bank",
    "Kotak Mahindra Bank",
    "Federal Bank",
];

const CITIES: [&str; 10] = [
    "Salem",
    "Coimbatore",
    "Madurai",
    "Chennai",
    "Tiruchirappalli",
    "Erode",
    "Vellore",
    "Tirunelveli",
    "Bengaluru",
    "Hosur",
];

const JEWELERS: [&str; 5] = [
    "Tanishq",
    "GRT Jewellers",
    "Lalitha Jewellery",
    "Joyalukkas",
    "Kalyan Jewellers",
];

const GOLD_ITEMS: [&str; 5] = ["coins", "necklace", "bangles", "chain", "earrings"];

const PLATFORMS: [&str; 5] = ["Zerodha", "Groww", "Upstox", "HDFC Securities", "Kuvera"];

const RETIREMENT_SCHEMES: [(&str, &str); 3] = [
    ("EPF", "EPFO"),
    ("PPF", "State Bank of India"),
    ("NPS Tier I", "NSDL"),
];

const OTHER_ASSETS: [&str; 4] = ["Royal Enfield", "Laptop", "Camera kit", "Furniture"];

const VEHICLE_MAKES: [&str; 4] = ["Maruti Swift", "Hyundai i20", "Honda City", "Tata Nexon"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Records, templates and liabilities that make up one demo household.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoPortfolio {
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub templates: Vec<CustomCategoryTemplate>,
}

/// Seeded generator of realistic portfolio records.
#[derive(Debug, Clone)]
pub struct PortfolioFaker {
    rng: DeterministicRng,
    next_id: usize,
}

impl PortfolioFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 0,
        }
    }

    /// One asset per selectable category, one per liability category, and a
    /// custom-category record of each kind.
    pub fn portfolio(&mut self) -> DemoPortfolio {
        let templates = vec![vehicle_template(), family_loan_template()];
        let mut assets = AssetCategory::OPTIONS
            .iter()
            .map(|category| self.asset(*category))
            .collect::<Vec<_>>();
        assets.push(self.vehicle(&templates[0]));

        let mut liabilities = LiabilityCategory::OPTIONS
            .iter()
            .map(|category| self.liability(*category))
            .collect::<Vec<_>>();
        liabilities.push(self.family_loan(&templates[1]));

        DemoPortfolio {
            assets,
            liabilities,
            templates,
        }
    }

    pub fn asset(&mut self, category: AssetCategory) -> Asset {
        let owner = self.pick(&OWNERS).to_owned();
        let bank = self.pick(&BANKS);
        let city = self.pick(&CITIES);
        let mut details = AssetDetails::default();

        let (name, value_cents) = match category {
            AssetCategory::Savings => {
                details.institution = Some(bank.to_owned());
                details.account_number = Some(self.account_number());
                (format!("{bank} Savings"), self.cents(20_000, 900_000))
            }
            AssetCategory::FixedDeposit => {
                let principal = self.cents(50_000, 1_000_000);
                let start = self.date_between(REFERENCE_YEAR - 3, REFERENCE_YEAR - 1);
                details.institution = Some(bank.to_owned());
                details.account_number = Some(self.account_number());
                details.purchase_date = Some(start);
                details.end_date = Some(start + Duration::days(365 * 3));
                details.initial_value_cents = Some(principal);
                details.rate_of_return = Some(self.rate(60, 78));
                (format!("{bank} FD"), principal + principal / 10)
            }
            AssetCategory::Land => {
                let price = self.cents(500_000, 4_000_000);
                details.location = Some(format!("{city}, Tamil Nadu"));
                details.purchase_date = Some(self.date_between(2005, REFERENCE_YEAR - 1));
                details.initial_value_cents = Some(price);
                details.description = Some(format!(
                    "Survey no. {}/{}",
                    self.int_range(100, 999),
                    self.int_range(1, 9)
                ));
                (format!("Plot in {city}"), price * self.int_range(12, 30) / 10)
            }
            AssetCategory::Gold => {
                let item = self.pick(&GOLD_ITEMS);
                (format!("Gold {item}"), self.cents(40_000, 600_000))
            }
            AssetCategory::GoldScheme => {
                let jeweler = self.pick(&JEWELERS);
                let start = self.date_between(REFERENCE_YEAR - 1, REFERENCE_YEAR - 1);
                let monthly = self.cents(2_000, 10_000);
                details.institution = Some(jeweler.to_owned());
                details.purchase_date = Some(start);
                details.end_date = Some(start + Duration::days(330));
                details.initial_value_cents = Some(monthly);
                details.monthly_payment_cents = Some(monthly);
                (format!("{jeweler} Gold Scheme"), monthly * 8)
            }
            AssetCategory::LentMoney => {
                let amount = self.cents(10_000, 300_000);
                let borrower = self.pick(&OWNERS);
                let lent = self.date_between(REFERENCE_YEAR - 2, REFERENCE_YEAR - 1);
                details.purchase_date = Some(lent);
                details.end_date = Some(lent + Duration::days(540));
                details.initial_value_cents = Some(amount);
                details.rate_of_return = Some(self.rate(0, 120));
                details.description = Some(format!("{borrower}, family friend"));
                (format!("Loan to {borrower}"), amount)
            }
            AssetCategory::Investment => {
                let platform = self.pick(&PLATFORMS);
                let invested = self.cents(50_000, 2_000_000);
                details.institution = Some(platform.to_owned());
                details.account_number = Some(self.account_number());
                details.initial_value_cents = Some(invested);
                details.rate_of_return = Some(self.rate(80, 150));
                (
                    format!("{platform} Portfolio"),
                    invested * self.int_range(8, 16) / 10,
                )
            }
            AssetCategory::Property => {
                let price = self.cents(2_500_000, 9_000_000);
                details.location = Some(format!(
                    "{} Main Road, {city}",
                    self.int_range(1, 250)
                ));
                details.purchase_date = Some(self.date_between(2010, REFERENCE_YEAR - 1));
                details.initial_value_cents = Some(price);
                details.description = Some("2BHK apartment".to_owned());
                details.document_url = Some("https://docs.example.in/sale-deed.pdf".to_owned());
                (format!("Apartment in {city}"), price * self.int_range(11, 20) / 10)
            }
            AssetCategory::Retirement => {
                let (scheme, provider) =
                    RETIREMENT_SCHEMES[self.rng.int_n(RETIREMENT_SCHEMES.len())];
                details.institution = Some(provider.to_owned());
                details.account_number = Some(self.account_number());
                (scheme.to_owned(), self.cents(100_000, 2_500_000))
            }
            AssetCategory::Other | AssetCategory::Custom => {
                let name = self.pick(&OTHER_ASSETS);
                (name.to_owned(), self.cents(20_000, 250_000))
            }
        };

        let category = if category == AssetCategory::Custom {
            CategoryShape::Fixed(AssetCategory::Other)
        } else {
            CategoryShape::Fixed(category)
        };
        let updated_at = self.datetime_in_year(REFERENCE_YEAR - 1);
        Asset {
            id: self.record_id("asset"),
            name,
            category,
            value_cents,
            owner,
            notes: String::new(),
            details,
            documents: Vec::new(),
            created_at: Some(updated_at - Duration::days(30)),
            updated_at,
        }
    }

    pub fn liability(&mut self, category: LiabilityCategory) -> Liability {
        let owner = self.pick(&OWNERS).to_owned();
        let bank = self.pick(&BANKS);
        let due_date = Some(self.date_between(REFERENCE_YEAR, REFERENCE_YEAR));

        let (name, balance_cents, institution, interest_rate) = match category {
            LiabilityCategory::Credit => (
                format!("{bank} Credit Card"),
                self.cents(5_000, 150_000),
                Some(bank.to_owned()),
                Some(self.rate(300, 420)),
            ),
            LiabilityCategory::Loan => (
                format!("Car Loan ({bank})"),
                self.cents(150_000, 900_000),
                Some(bank.to_owned()),
                Some(self.rate(85, 110)),
            ),
            LiabilityCategory::Mortgage => (
                "Home Loan".to_owned(),
                self.cents(1_500_000, 6_000_000),
                Some(bank.to_owned()),
                Some(self.rate(80, 95)),
            ),
            LiabilityCategory::Tax => (
                "Property Tax".to_owned(),
                self.cents(3_000, 25_000),
                None,
                None,
            ),
            LiabilityCategory::Other | LiabilityCategory::Custom => (
                "Hand loan".to_owned(),
                self.cents(5_000, 80_000),
                None,
                None,
            ),
        };
        let category = if category == LiabilityCategory::Custom {
            CategoryShape::Fixed(LiabilityCategory::Other)
        } else {
            CategoryShape::Fixed(category)
        };

        Liability {
            id: self.record_id("liability"),
            name,
            category,
            balance_cents,
            interest_rate,
            due_date,
            institution,
            owner,
            notes: String::new(),
            updated_at: self.datetime_in_year(REFERENCE_YEAR - 1),
        }
    }

    /// Custom asset built from `template`, with every field filled in.
    pub fn vehicle(&mut self, template: &CustomCategoryTemplate) -> Asset {
        let make = self.pick(&VEHICLE_MAKES);
        let mut fields = materialize_custom_fields(template);
        for field in &mut fields {
            field.value = match field.name.as_str() {
                "Registration" => Scalar::Text(format!(
                    "TN-{:02}-AB-{:04}",
                    self.int_range(1, 99),
                    self.int_range(1, 9999)
                )),
                "Model Year" => Scalar::Number(self.int_range(2012, 2025) as f64),
                "Insurance Renewal" => {
                    Scalar::Text(self.date_between(REFERENCE_YEAR, REFERENCE_YEAR).to_string())
                }
                _ => Scalar::Null,
            };
        }
        let updated_at = self.datetime_in_year(REFERENCE_YEAR - 1);
        Asset {
            id: self.record_id("asset"),
            name: make.to_owned(),
            category: CategoryShape::Custom {
                template_name: template.name.clone(),
                fields,
            },
            value_cents: self.cents(300_000, 1_200_000),
            owner: self.pick(&OWNERS).to_owned(),
            notes: String::new(),
            details: AssetDetails::default(),
            documents: Vec::new(),
            created_at: Some(updated_at),
            updated_at,
        }
    }

    pub fn family_loan(&mut self, template: &CustomCategoryTemplate) -> Liability {
        let lender = self.pick(&OWNERS);
        let mut fields = materialize_custom_fields(template);
        for field in &mut fields {
            if field.name == "Lender" {
                field.value = Scalar::text(lender);
            }
        }
        Liability {
            id: self.record_id("liability"),
            name: format!("Borrowed from {lender}"),
            category: CategoryShape::Custom {
                template_name: template.name.clone(),
                fields,
            },
            balance_cents: self.cents(10_000, 200_000),
            interest_rate: None,
            due_date: None,
            institution: None,
            owner: self.pick(&OWNERS).to_owned(),
            notes: "Repay after harvest".to_owned(),
            updated_at: self.datetime_in_year(REFERENCE_YEAR - 1),
        }
    }

    fn record_id(&mut self, prefix: &str) -> RecordId {
        self.next_id += 1;
        RecordId::new(format!("demo-{prefix}-{:02}", self.next_id))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    /// Whole-rupee amount between the bounds, in cents.
    fn cents(&mut self, min_major: i64, max_major: i64) -> i64 {
        self.int_range(min_major, max_major) * 100
    }

    /// Percentage with one decimal, from tenths.
    fn rate(&mut self, min_tenths: i64, max_tenths: i64) -> f64 {
        self.int_range(min_tenths, max_tenths) as f64 / 10.0
    }

    fn account_number(&mut self) -> String {
        format!(
            "{:04}{:08}",
            self.int_range(1000, 9999),
            self.int_range(0, 99_999_999)
        )
    }

    fn date_between(&mut self, first_year: i32, last_year: i32) -> Date {
        let start = midnight_utc(first_year, Month::January, 1);
        let end = midnight_utc(last_year, Month::December, 31);
        let days = (end - start).whole_days();
        (start + Duration::days(self.int_range(0, days))).date()
    }

    fn datetime_in_year(&mut self, year: i32) -> OffsetDateTime {
        let start = midnight_utc(year, Month::January, 1);
        start + Duration::seconds(self.int_range(0, 365 * 24 * 60 * 60 - 1))
    }
}

pub fn vehicle_template() -> CustomCategoryTemplate {
    CustomCategoryTemplate {
        id: TemplateId::new("tpl-vehicle"),
        name: "Vehicle".to_owned(),
        category_type: EntityKind::Asset,
        description: Some("Cars and two-wheelers".to_owned()),
        icon: Some("ri-car-line".to_owned()),
        fields: vec![
            template_field("tf-registration", "Registration", FieldType::Text, true),
            template_field("tf-model-year", "Model Year", FieldType::Number, false),
            template_field("tf-insurance", "Insurance Renewal", FieldType::Date, false),
        ],
        created_at: reference_now(),
        updated_at: reference_now(),
    }
}

pub fn family_loan_template() -> CustomCategoryTemplate {
    CustomCategoryTemplate {
        id: TemplateId::new("tpl-family-loan"),
        name: "Family Loan".to_owned(),
        category_type: EntityKind::Liability,
        description: None,
        icon: None,
        fields: vec![
            template_field("tf-lender", "Lender", FieldType::Text, true),
            template_field("tf-lender-phone", "Lender Phone", FieldType::Tel, false),
        ],
        created_at: reference_now(),
        updated_at: reference_now(),
    }
}

fn template_field(id: &str, name: &str, field_type: FieldType, required: bool) -> CustomFieldTemplate {
    CustomFieldTemplate {
        id: FieldId::new(id),
        name: name.to_owned(),
        field_type,
        required,
        placeholder: None,
    }
}

pub fn temp_snapshot_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("snapshot.json");
    Ok((dir, path))
}

fn reference_now() -> OffsetDateTime {
    midnight_utc(REFERENCE_YEAR, Month::January, 1)
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(year, month, day).expect("valid calendar date");
    date.with_time(Time::MIDNIGHT).assume_utc()
}
