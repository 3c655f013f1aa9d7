//! Dashboard routes.
//!
//! Each route turns loaded rows into a serializable report for one dashboard
//! page. Routes own the layout and labels; the numbers come from
//! [`crate::services`].

pub mod material_report;
pub mod pour_dashboard;

pub use material_report::{
    build_material_report, MaterialReport, SummaryEntry, GET_MATERIAL_REPORT,
};
pub use pour_dashboard::{
    build_pour_dashboard, pour_dashboard_from_kpis, KpiPanel, PourDashboard,
    DASHBOARD_LAYOUT, GET_POUR_DASHBOARD,
};

/// Names of every route, in dashboard order.
pub const ROUTES: [&str; 2] = [GET_POUR_DASHBOARD, GET_MATERIAL_REPORT];
