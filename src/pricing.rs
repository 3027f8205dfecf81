//! Pricing module
//!
//! This module prices job posts and subscriptions:
//! - `Price` - exact amounts in cents
//! - `PricingTier` / `AddOn` - catalogue entries
//! - `PricingSelection` - the tier and add-on toggles a user picked
//! - `compute_total` - tier base price plus every enabled, eligible add-on
//! - `PricingCatalog` - the app's job-post and subscription catalogues

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// An amount of money in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero
    pub const ZERO: Price = Price(0);

    /// From a number of cents
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// From whole dollars, saturating at `u64::MAX` cents
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Amount in cents
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Whether the amount is zero
    pub const fn is_free(self) -> bool {
        self.0 == 0
    }

    /// `self + rhs`, or `None` on overflow
    pub const fn checked_add(self, rhs: Price) -> Option<Price> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Price(cents)),
            None => None,
        }
    }

    /// Sum of `prices`, or `None` if it does not fit in a `Price`
    pub fn checked_sum<I: IntoIterator<Item = Price>>(prices: I) -> Option<Price> {
        prices.into_iter().try_fold(Price::ZERO, Price::checked_add)
    }
}

/// Saturates at `u64::MAX` cents. Totals go through `checked_add` instead.
impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    /// `$799` for whole amounts, `$9.99` otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (dollars, cents) = (self.0 / 100, self.0 % 100);
        if cents == 0 {
            write!(f, "${}", dollars)
        } else {
            write!(f, "${}.{:02}", dollars, cents)
        }
    }
}

/// A mutually exclusive base pricing option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Tier identifier (e.g. "basic")
    pub id: String,
    /// Display name
    pub name: String,
    /// Price before add-ons
    pub base_price: Price,
    /// Billing period or visibility window (e.g. "30 days", "per month")
    pub duration: String,
    /// Feature bullet points
    pub features: Vec<String>,
    /// Highlighted as the most popular option
    #[serde(default)]
    pub popular: bool,
}

impl PricingTier {
    /// Create a tier with no features listed
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: Price, duration: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            duration: duration.into(),
            features: Vec::new(),
            popular: false,
        }
    }

    /// Set the feature list
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as the most popular option
    pub fn popular(mut self) -> Self {
        self.popular = true;
        self
    }
}

/// An optional, independently toggled surcharge on top of a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    /// Add-on identifier (e.g. "featured_upgrade")
    pub id: String,
    /// Display name
    pub name: String,
    /// Amount added to the total when applied
    pub price_delta: Price,
    /// Tiers this add-on may be applied to; empty means any tier
    #[serde(default)]
    pub eligible_tiers: BTreeSet<String>,
    /// Tier that already includes this add-on; only consulted when
    /// `eligible_tiers` is empty
    #[serde(default)]
    pub redundant_with: Option<String>,
}

impl AddOn {
    /// Create an add-on eligible under every tier
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_delta: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_delta,
            eligible_tiers: BTreeSet::new(),
            redundant_with: None,
        }
    }

    /// Restrict the add-on to the given tiers
    pub fn eligible_for<I, S>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_tiers = tiers.into_iter().map(Into::into).collect();
        self
    }

    /// Exclude the tier that already includes this add-on
    pub fn redundant_with(mut self, tier_id: impl Into<String>) -> Self {
        self.redundant_with = Some(tier_id.into());
        self
    }

    /// Whether the add-on applies under `tier_id`
    pub fn is_eligible(&self, tier_id: &str) -> bool {
        if self.eligible_tiers.is_empty() {
            self.redundant_with.as_deref() != Some(tier_id)
        } else {
            self.eligible_tiers.contains(tier_id)
        }
    }
}

/// The tier and add-on toggles a user picked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSelection {
    /// Selected tier identifier
    pub tier_id: String,
    /// Add-on toggles keyed by add-on identifier
    #[serde(default)]
    pub add_ons: BTreeMap<String, bool>,
}

impl PricingSelection {
    /// Select a tier with every add-on off
    pub fn new(tier_id: impl Into<String>) -> Self {
        Self {
            tier_id: tier_id.into(),
            add_ons: BTreeMap::new(),
        }
    }

    /// Builder form of [`PricingSelection::set_add_on`]
    pub fn with_add_on(mut self, add_on_id: impl Into<String>, enabled: bool) -> Self {
        self.set_add_on(add_on_id, enabled);
        self
    }

    /// Toggle an add-on
    pub fn set_add_on(&mut self, add_on_id: impl Into<String>, enabled: bool) {
        self.add_ons.insert(add_on_id.into(), enabled);
    }

    /// Switch tiers, keeping the add-on toggles
    ///
    /// Toggles that become ineligible stay set but no longer count.
    pub fn select_tier(&mut self, tier_id: impl Into<String>) {
        self.tier_id = tier_id.into();
    }

    /// Ids of the add-ons toggled on
    pub fn enabled_add_ons(&self) -> impl Iterator<Item = &str> {
        self.add_ons
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(id, _)| id.as_str())
    }
}

/// Add-ons from `add_ons` that are enabled in `selection` and eligible under `tier_id`
fn applied_add_ons<'a>(
    selection: &'a PricingSelection,
    tier_id: &'a str,
    add_ons: &'a [AddOn],
) -> impl Iterator<Item = &'a AddOn> + 'a {
    selection.enabled_add_ons().filter_map(move |id| {
        let Some(add_on) = add_ons.iter().find(|a| a.id == id) else {
            tracing::debug!("Ignoring unknown add-on {}", id);
            return None;
        };
        if !add_on.is_eligible(tier_id) {
            tracing::debug!("Ignoring add-on {} not eligible under tier {}", id, tier_id);
            return None;
        }
        Some(add_on)
    })
}

fn find_tier<'a>(tiers: &'a [PricingTier], tier_id: &str) -> Result<&'a PricingTier> {
    tiers
        .iter()
        .find(|t| t.id == tier_id)
        .ok_or_else(|| Error::InvalidTier {
            tier_id: tier_id.to_string(),
        })
}

/// Total price of a selection
///
/// The tier's base price plus the `price_delta` of every add-on that is
/// both enabled and eligible under the selected tier. Enabled add-ons
/// that are ineligible or not in `add_ons` are ignored.
///
/// # Errors
/// Returns [`Error::InvalidTier`] if `selection.tier_id` is not in `tiers`, and
/// [`Error::PriceOverflow`] if the total exceeds `u64::MAX` cents
///
/// # Example
/// ```rust
/// use itpro::pricing::{compute_total, Price, PricingCatalog, PricingSelection};
///
/// let catalog = PricingCatalog::job_posts();
/// let selection = PricingSelection::new("basic")
///     .with_add_on("featured_upgrade", true)
///     .with_add_on("sponsored_upgrade", true);
///
/// let total = compute_total(&selection, &catalog.tiers, &catalog.add_ons).unwrap();
/// assert_eq!(total, Price::from_dollars(799));
/// ```
pub fn compute_total(selection: &PricingSelection, tiers: &[PricingTier], add_ons: &[AddOn]) -> Result<Price> {
    let tier = find_tier(tiers, &selection.tier_id)?;
    let extras = applied_add_ons(selection, &tier.id, add_ons).map(|a| a.price_delta);
    checked_total(std::iter::once(tier.base_price).chain(extras), &tier.id)
}

fn checked_total<I: IntoIterator<Item = Price>>(prices: I, tier_id: &str) -> Result<Price> {
    Price::checked_sum(prices).ok_or_else(|| {
        tracing::warn!("Total for tier {} overflows", tier_id);
        Error::PriceOverflow {
            tier_id: tier_id.to_string(),
        }
    })
}

/// One line of an itemized quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Tier or add-on identifier
    pub id: String,
    /// Display label
    pub label: String,
    /// Amount for this line
    pub amount: Price,
}

/// Itemized price for a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Tier line first, then one line per applied add-on
    pub items: Vec<LineItem>,
    /// Sum of all line amounts
    pub total: Price,
}

/// A set of tiers and the add-ons that can go on top of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingCatalog {
    /// Available tiers, in display order
    pub tiers: Vec<PricingTier>,
    /// Available add-ons, in display order
    pub add_ons: Vec<AddOn>,
}

impl PricingCatalog {
    /// Job-post packages
    pub fn job_posts() -> Self {
        Self {
            tiers: vec![
                PricingTier::new("basic", "Basic Job Post", Price::from_dollars(299), "30 days").with_features([
                    "Standard job listing",
                    "30-day visibility",
                    "Basic applicant tracking",
                    "Email notifications",
                ]),
                PricingTier::new("featured", "Featured Job Post", Price::from_dollars(499), "30 days")
                    .with_features([
                        "Everything in Basic",
                        "Featured placement",
                        "Highlighted in search",
                        "Priority in job feed",
                        "Enhanced visibility",
                        "Social media promotion",
                    ])
                    .popular(),
                PricingTier::new("sponsored", "Sponsored Job Post", Price::from_dollars(799), "30 days")
                    .with_features([
                        "Everything in Featured",
                        "Top search placement",
                        "Homepage banner",
                        "Email newsletter inclusion",
                        "LinkedIn promotion",
                        "Dedicated account support",
                    ]),
            ],
            add_ons: vec![
                AddOn::new("featured_upgrade", "Featured upgrade", Price::from_dollars(200)).eligible_for(["basic"]),
                AddOn::new("sponsored_upgrade", "Sponsored upgrade", Price::from_dollars(300))
                    .eligible_for(["basic", "featured"]),
            ],
        }
    }

    /// Monthly subscription plans
    pub fn subscriptions() -> Self {
        Self {
            tiers: vec![
                PricingTier::new("free", "Free", Price::ZERO, "Forever").with_features([
                    "Basic profile creation",
                    "Up to 50 connections",
                    "Basic job search",
                    "10 messages per month",
                    "Join public events",
                ]),
                PricingTier::new("professional", "Professional", Price::from_cents(999), "per month")
                    .with_features([
                        "Everything in Free",
                        "Unlimited connections",
                        "Advanced job search filters",
                        "Unlimited messaging",
                        "Profile analytics",
                        "Priority job applications",
                        "5 InMail credits per month",
                        "Create private events",
                    ])
                    .popular(),
                PricingTier::new("business", "Business", Price::from_cents(2999), "per month").with_features([
                    "Everything in Professional",
                    "Post jobs (5 per month)",
                    "Company page creation",
                    "Applicant tracking",
                    "Host unlimited events",
                    "Advanced analytics",
                    "Recruitment tools",
                    "Team collaboration",
                ]),
                PricingTier::new("enterprise", "Enterprise", Price::from_cents(9999), "per month").with_features([
                    "Everything in Business",
                    "Unlimited job postings",
                    "Custom branding",
                    "API access",
                    "Priority support",
                    "Advanced recruitment suite",
                    "White-label options",
                    "Dedicated account manager",
                ]),
            ],
            add_ons: Vec::new(),
        }
    }

    /// Look up a tier by id
    pub fn tier(&self, tier_id: &str) -> Option<&PricingTier> {
        self.tiers.iter().find(|t| t.id == tier_id)
    }

    /// Add-ons a user can toggle while `tier_id` is selected
    pub fn available_add_ons<'a>(&'a self, tier_id: &'a str) -> impl Iterator<Item = &'a AddOn> + 'a {
        self.add_ons.iter().filter(move |a| a.is_eligible(tier_id))
    }

    /// Total price of a selection against this catalogue
    pub fn total(&self, selection: &PricingSelection) -> Result<Price> {
        compute_total(selection, &self.tiers, &self.add_ons)
    }

    /// Itemized price of a selection against this catalogue
    ///
    /// # Errors
    /// Returns [`Error::InvalidTier`] if the selected tier is unknown, and
    /// [`Error::PriceOverflow`] if the lines do not sum to a valid `Price`
    pub fn quote(&self, selection: &PricingSelection) -> Result<Quote> {
        let tier = find_tier(&self.tiers, &selection.tier_id)?;

        let mut items = vec![LineItem {
            id: tier.id.clone(),
            label: tier.name.clone(),
            amount: tier.base_price,
        }];
        items.extend(applied_add_ons(selection, &tier.id, &self.add_ons).map(|a| LineItem {
            id: a.id.clone(),
            label: a.name.clone(),
            amount: a.price_delta,
        }));

        let total = checked_total(items.iter().map(|i| i.amount), &tier.id)?;
        Ok(Quote { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_dollars(799).to_string(), "$799");
        assert_eq!(Price::from_cents(999).to_string(), "$9.99");
        assert_eq!(Price::from_cents(2905).to_string(), "$29.05");
        assert_eq!(Price::ZERO.to_string(), "$0");
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from_dollars(1), Price::from_cents(50), Price::from_cents(25)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 175);
        assert!(Price::ZERO.is_free());
        assert!(!total.is_free());
    }

    #[test]
    fn test_price_arithmetic_at_the_limit() {
        let near_max = Price::from_cents(u64::MAX - 10);

        assert_eq!(near_max.checked_add(Price::from_cents(10)), Some(Price::from_cents(u64::MAX)));
        assert_eq!(near_max.checked_add(Price::from_cents(11)), None);
        assert_eq!(Price::checked_sum([near_max, Price::from_cents(100)]), None);
        assert_eq!((near_max + Price::from_cents(100)).cents(), u64::MAX);
        assert_eq!(Price::from_dollars(u64::MAX).cents(), u64::MAX);
    }

    #[test]
    fn test_add_on_eligibility_rules() {
        let restricted = AddOn::new("x", "X", Price::from_dollars(1)).eligible_for(["basic"]);
        assert!(restricted.is_eligible("basic"));
        assert!(!restricted.is_eligible("featured"));

        let open = AddOn::new("y", "Y", Price::from_dollars(1));
        assert!(open.is_eligible("basic"));
        assert!(open.is_eligible("anything"));

        let redundant = AddOn::new("z", "Z", Price::from_dollars(1)).redundant_with("sponsored");
        assert!(redundant.is_eligible("basic"));
        assert!(!redundant.is_eligible("sponsored"));
    }
}
