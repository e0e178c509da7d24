//! Unit economics for a client's service lines.
//!
//! Answers "what may a conversion cost before we lose money?" from the
//! average order value, taxes, returns, cost of goods and fulfillment.
//! Percentages are expressed as 0–100.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from service-line validation and bookkeeping.
#[derive(Debug, Error, PartialEq)]
pub enum EconomicsError {
    /// A value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Offending field.
        field: &'static str,
    },
    /// An amount is negative.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A percentage lies outside 0–100.
    #[error("{field} must be between 0 and 100 percent (got {value})")]
    PercentOutOfRange {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The service line name is blank.
    #[error("service line name must not be empty")]
    EmptyName,
    /// No service line with this id.
    #[error("unknown service line: {0}")]
    UnknownServiceLine(Uuid),
    /// The last remaining service line cannot be removed.
    #[error("cannot delete the last service line")]
    LastServiceLine,
}

/// Economics of one profit centre (e.g. a product group or a service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// ISO currency code.
    pub currency: String,
    /// Average order value, gross.
    pub aov: f64,
    /// Target return on ad spend (revenue / ad spend).
    pub target_roas: f64,
    /// Sales tax, percent.
    pub tax_rate: f64,
    /// Returned orders, percent.
    pub return_rate: f64,
    /// Cost of goods sold, percent of net revenue.
    pub cogs: f64,
    /// Fixed fulfillment cost per order.
    pub fulfillment_cost: f64,
}

impl Default for ServiceLine {
    fn default() -> Self {
        Self::named("General")
    }
}

impl ServiceLine {
    /// A service line with the default assumptions.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency: "EUR".to_owned(),
            aov: 100.0,
            target_roas: 4.0,
            tax_rate: 19.0,
            return_rate: 10.0,
            cogs: 30.0,
            fulfillment_cost: 5.0,
        }
    }

    /// Check every input for plausibility.
    ///
    /// # Errors
    ///
    /// Returns the first [`EconomicsError`] found.
    pub fn validate(&self) -> Result<(), EconomicsError> {
        if self.name.trim().is_empty() {
            return Err(EconomicsError::EmptyName);
        }
        for (field, value) in [
            ("aov", self.aov),
            ("target_roas", self.target_roas),
            ("fulfillment_cost", self.fulfillment_cost),
        ] {
            check_finite(field, value)?;
            if value < 0.0 {
                return Err(EconomicsError::Negative { field, value });
            }
        }
        for (field, value) in [
            ("tax_rate", self.tax_rate),
            ("return_rate", self.return_rate),
            ("cogs", self.cogs),
        ] {
            check_finite(field, value)?;
            if !(0.0..=100.0).contains(&value) {
                return Err(EconomicsError::PercentOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), EconomicsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EconomicsError::NotFinite { field })
    }
}

/// Per-order figures derived from a [`ServiceLine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMetrics {
    /// Revenue after tax and returns.
    pub net_revenue: f64,
    /// Net revenue minus cost of goods and fulfillment.
    pub gross_profit: f64,
    /// Ad spend per order at the target ROAS.
    pub ad_spend: f64,
    /// Gross profit minus ad spend.
    pub net_profit: f64,
    /// ROAS at which profit is zero; `None` when no order is profitable.
    pub break_even_roas: Option<f64>,
    /// Highest cost per acquisition that still breaks even.
    pub break_even_cpa: f64,
}

impl UnitMetrics {
    /// Compute the metrics. A target ROAS of zero means no ad spend.
    pub fn compute(line: &ServiceLine) -> Self {
        let net_revenue = line.aov * (1.0 - line.tax_rate / 100.0) * (1.0 - line.return_rate / 100.0);
        let gross_profit = net_revenue * (1.0 - line.cogs / 100.0) - line.fulfillment_cost;
        let ad_spend = if line.target_roas > 0.0 {
            line.aov / line.target_roas
        } else {
            0.0
        };
        let break_even_roas = (gross_profit > 0.0).then(|| line.aov / gross_profit);

        Self {
            net_revenue,
            gross_profit,
            ad_spend,
            net_profit: gross_profit - ad_spend,
            break_even_roas,
            break_even_cpa: gross_profit,
        }
    }

    /// Whether an order at the target ROAS makes money.
    pub fn is_profitable(&self) -> bool {
        self.net_profit > 0.0
    }
}

/// A client's service lines with one active selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLineBook {
    lines: Vec<ServiceLine>,
    active: Uuid,
}

impl Default for ServiceLineBook {
    fn default() -> Self {
        let line = ServiceLine::default();
        Self {
            active: line.id,
            lines: vec![line],
        }
    }
}

impl ServiceLineBook {
    /// Build from stored lines; an empty list yields the default line.
    pub fn from_lines(lines: Vec<ServiceLine>) -> Self {
        match lines.first() {
            Some(first) => Self {
                active: first.id,
                lines,
            },
            None => Self::default(),
        }
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[ServiceLine] {
        &self.lines
    }

    /// The selected line.
    pub fn active(&self) -> Option<&ServiceLine> {
        self.lines.iter().find(|line| line.id == self.active)
    }

    /// Metrics of the selected line.
    pub fn active_metrics(&self) -> Option<UnitMetrics> {
        self.active().map(UnitMetrics::compute)
    }

    /// Validate and append a line, making it active.
    ///
    /// # Errors
    ///
    /// Returns [`EconomicsError`] if the line is invalid.
    pub fn add(&mut self, line: ServiceLine) -> Result<Uuid, EconomicsError> {
        line.validate()?;
        let id = line.id;
        self.lines.push(line);
        self.active = id;
        Ok(id)
    }

    /// Select a line.
    ///
    /// # Errors
    ///
    /// Returns [`EconomicsError::UnknownServiceLine`] for an unknown id.
    pub fn select(&mut self, id: Uuid) -> Result<(), EconomicsError> {
        if !self.lines.iter().any(|line| line.id == id) {
            return Err(EconomicsError::UnknownServiceLine(id));
        }
        self.active = id;
        Ok(())
    }

    /// Remove a line; the first remaining line becomes active if needed.
    ///
    /// # Errors
    ///
    /// Returns [`EconomicsError::LastServiceLine`] when only one line is
    /// left, [`EconomicsError::UnknownServiceLine`] for an unknown id.
    pub fn remove(&mut self, id: Uuid) -> Result<ServiceLine, EconomicsError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(EconomicsError::UnknownServiceLine(id))?;
        if self.lines.len() <= 1 {
            return Err(EconomicsError::LastServiceLine);
        }
        let removed = self.lines.remove(position);
        if self.active == id {
            if let Some(first) = self.lines.first() {
                self.active = first.id;
            }
        }
        Ok(removed)
    }
}
