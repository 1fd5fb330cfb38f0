//! Transaction history search.
//!
//! Dates are calendar days in UTC and both ends are inclusive.

use std::str::FromStr;

use chrono::{Duration, NaiveDate};

use crate::database::store::TransactionQuery;
use crate::errors::AppError;
use crate::models::transaction::{Transaction, TransactionStatus, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    fn accepts(&self, t: &TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted == t,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        TransactionType::KNOWN
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .cloned()
            .map(TypeFilter::Only)
            .ok_or_else(|| AppError::invalid_data(format!("Unknown transaction type: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TransactionStatus),
}

impl StatusFilter {
    fn accepts(&self, s: TransactionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == s,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "success" => Ok(StatusFilter::Only(TransactionStatus::Success)),
            "failed" => Ok(StatusFilter::Only(TransactionStatus::Failed)),
            "pending" => Ok(StatusFilter::Only(TransactionStatus::Pending)),
            _ => Err(AppError::invalid_data(format!("Unknown status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub transaction_type: TypeFilter,
    pub status: StatusFilter,
}

impl HistoryFilter {
    pub const DEFAULT_RANGE_DAYS: i64 = 7;

    /// First-load filter: everything from the last seven days.
    pub fn trailing_week(today: NaiveDate) -> Self {
        HistoryFilter {
            start_date: today - Duration::days(Self::DEFAULT_RANGE_DAYS),
            end_date: today,
            transaction_type: TypeFilter::All,
            status: StatusFilter::All,
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        let day = tx.created_at.date_naive();
        day >= self.start_date
            && day <= self.end_date
            && self.transaction_type.accepts(&tx.transaction_type)
            && self.status.accepts(tx.status)
    }

    /// Matching rows, newest first.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    /// The same search expressed as a store query for one user.
    pub fn to_query(&self, user_id: &str) -> TransactionQuery {
        let mut query = TransactionQuery::for_user(user_id);
        query.created_from = self.start_date.and_hms_opt(0, 0, 0);
        query.created_before = self
            .end_date
            .succ_opt()
            .and_then(|next| next.and_hms_opt(0, 0, 0));
        if let TypeFilter::Only(t) = &self.transaction_type {
            query.transaction_type = Some(t.clone());
        }
        if let StatusFilter::Only(s) = self.status {
            query.status = Some(s);
        }
        query
    }
}
