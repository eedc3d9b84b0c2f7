use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub enum RoleTO {
    #[serde(rename = "STAFF")]
    Staff,
    #[serde(rename = "CONTADOR")]
    Accountant,
    #[serde(rename = "EMPLEADO")]
    Employee,
}
#[cfg(feature = "service-impl")]
impl From<service::Role> for RoleTO {
    fn from(role: service::Role) -> Self {
        match role {
            service::Role::Staff => Self::Staff,
            service::Role::Accountant => Self::Accountant,
            service::Role::Employee => Self::Employee,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<RoleTO> for service::Role {
    fn from(role: RoleTO) -> Self {
        match role {
            RoleTO::Staff => Self::Staff,
            RoleTO::Accountant => Self::Accountant,
            RoleTO::Employee => Self::Employee,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserTO {
    pub id: Uuid,
    pub username: Arc<str>,
    pub email: Arc<str>,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub phone: Arc<str>,
    pub role: RoleTO,
    pub is_approved: bool,
    pub is_staff: bool,
    #[serde(default)]
    pub date_joined: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::account::User> for UserTO {
    fn from(user: &service::account::User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            role: user.role.into(),
            is_approved: user.is_approved,
            is_staff: user.is_staff,
            date_joined: user.date_joined,
            version: user.version,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationTO {
    pub username: Arc<str>,
    pub email: Arc<str>,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    #[serde(default)]
    pub phone: Option<Arc<str>>,
    pub password: Arc<str>,
    pub password_confirmation: Arc<str>,
}
#[cfg(feature = "service-impl")]
impl From<&RegistrationTO> for service::account::Registration {
    fn from(registration: &RegistrationTO) -> Self {
        Self {
            username: registration.username.clone(),
            email: registration.email.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            phone: registration.phone.clone().unwrap_or_else(|| "".into()),
            password: registration.password.clone(),
            password_confirmation: registration.password_confirmation.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginTO {
    pub username: Arc<str>,
    pub password: Arc<str>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApprovalTO {
    pub role: RoleTO,
    pub is_approved: bool,
    #[serde(rename = "$version")]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&ApprovalTO> for service::account::Approval {
    fn from(approval: &ApprovalTO) -> Self {
        Self {
            role: approval.role.into(),
            is_approved: approval.is_approved,
            version: approval.version,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportTO {
    pub id: Uuid,
    pub user_id: Uuid,
    pub place_description: Arc<str>,
    pub start_date: Date,
    pub start_hour: u8,
    pub end_date: Date,
    pub end_hour: u8,
    #[schema(value_type = String, example = "8.00")]
    pub worked_hours: Decimal,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::report::Report> for ReportTO {
    fn from(report: &service::report::Report) -> Self {
        Self {
            id: report.id,
            user_id: report.user_id,
            place_description: report.place_description.clone(),
            start_date: report.period().start_date(),
            start_hour: report.period().start_hour(),
            end_date: report.period().end_date(),
            end_hour: report.period().end_hour(),
            worked_hours: report.worked_hours(),
            created: report.created,
            version: report.version,
        }
    }
}

/// A new report. Worked hours are always computed by the server.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReportTO {
    pub place_description: Arc<str>,
    pub start_date: Date,
    pub start_hour: u8,
    pub end_date: Date,
    pub end_hour: u8,
}
#[cfg(feature = "service-impl")]
impl From<&CreateReportTO> for service::report::ReportSubmission {
    fn from(report: &CreateReportTO) -> Self {
        Self {
            place_description: report.place_description.clone(),
            start_date: report.start_date,
            start_hour: report.start_hour,
            end_date: report.end_date,
            end_hour: report.end_hour,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DailySummaryTO {
    pub date: Date,
    #[schema(value_type = String, example = "9.00")]
    pub total_hours: Decimal,
    #[schema(value_type = String, example = "8.00")]
    pub regular_hours: Decimal,
    #[schema(value_type = String, example = "1.00")]
    pub overtime_hours: Decimal,
    pub reports: Arc<[ReportTO]>,
}
#[cfg(feature = "service-impl")]
impl From<&service::daily_summary::DailySummary> for DailySummaryTO {
    fn from(summary: &service::daily_summary::DailySummary) -> Self {
        Self {
            date: summary.date,
            total_hours: summary.total_hours,
            regular_hours: summary.regular_hours,
            overtime_hours: summary.overtime_hours,
            reports: summary.reports.iter().map(ReportTO::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind")]
pub enum DashboardTO {
    PendingApproval {
        user: UserTO,
    },
    Staff {
        user: UserTO,
        pending_users: Arc<[UserTO]>,
        users: Arc<[UserTO]>,
    },
    Accountant {
        user: UserTO,
        reports: Arc<[ReportTO]>,
        employees: Arc<[UserTO]>,
    },
    Employee {
        user: UserTO,
        recent_reports: Arc<[ReportTO]>,
    },
}
#[cfg(feature = "service-impl")]
impl From<&service::dashboard::Dashboard> for DashboardTO {
    fn from(dashboard: &service::dashboard::Dashboard) -> Self {
        use service::dashboard::Dashboard;
        match dashboard {
            Dashboard::PendingApproval { user } => Self::PendingApproval { user: user.into() },
            Dashboard::Staff {
                user,
                pending_users,
                users,
            } => Self::Staff {
                user: user.into(),
                pending_users: pending_users.iter().map(UserTO::from).collect(),
                users: users.iter().map(UserTO::from).collect(),
            },
            Dashboard::Accountant {
                user,
                reports,
                employees,
            } => Self::Accountant {
                user: user.into(),
                reports: reports.iter().map(ReportTO::from).collect(),
                employees: employees.iter().map(UserTO::from).collect(),
            },
            Dashboard::Employee {
                user,
                recent_reports,
            } => Self::Employee {
                user: user.into(),
                recent_reports: recent_reports.iter().map(ReportTO::from).collect(),
            },
        }
    }
}
