//! `SeaORM` Entity prelude

pub use super::etf_flows::Entity as EtfFlows;
