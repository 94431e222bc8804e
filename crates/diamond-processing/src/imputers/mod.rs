//! Imputation module for handling missing values.
//!
//! Missing measurements are filled with the arithmetic mean of the column's
//! non-missing values.

mod statistical;

pub use statistical::StatisticalImputer;
