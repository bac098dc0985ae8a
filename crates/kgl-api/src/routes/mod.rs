//! # Route Modules
//!
//! | Path | Role | Module |
//! |---|---|---|
//! | `POST /procurement` | `manager` | [`procurement`] |
//! | `POST /sales/cash` | `SalesAgent` | [`sales`] |
//! | `POST /sales/credit` | `SalesAgent` | [`sales`] |

pub mod procurement;
pub mod sales;
