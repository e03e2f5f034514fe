//! Console screens.
//!
//! Every module of the console is a variant of [`Screen`] carrying its own
//! closed tab enum, so adding a tab forces every `match` to handle it.
//! Each screen maps to one backend table described by a static [`TableSpec`].

use serde::{Deserialize, Serialize};

use crate::traits::{PageQuery, SortDir, SortSpec};

/// How a column's values look; drives formatting and synthetic data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Id,
    Name,
    Company,
    Email,
    /// Human readable code with a fixed prefix, e.g. `INV-00042`
    Code(&'static str),
    /// Integer minor units (paise)
    Money,
    Count { min: i64, max: i64 },
    /// `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp
    Timestamp,
    /// One of a fixed set of labels
    Status(&'static [&'static str]),
    /// Free text that may wrap over several lines
    Notes,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Id | ColumnKind::Money | ColumnKind::Count { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: ColumnKind,
    /// Initial width in points
    pub width: f32,
    pub nullable: bool,
}

impl ColumnSpec {
    const fn new(key: &'static str, title: &'static str, kind: ColumnKind, width: f32) -> Self {
        Self { key, title, kind, width, nullable: false }
    }

    const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Backend table behind a screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSpec {
    pub table: &'static str,
    pub sort_field: &'static str,
    pub sort_dir: SortDir,
    pub id_field: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    pub fn sort(&self) -> SortSpec {
        SortSpec::new(self.sort_field, self.sort_dir)
    }

    /// Page query for this table selecting all displayed columns.
    pub fn query(&self, page_size: usize) -> PageQuery {
        PageQuery::new(self.table, self.sort())
            .with_id_field(self.id_field)
            .with_page_size(page_size)
            .with_fields(self.columns.iter().map(|c| c.key))
    }

    pub fn column(&self, key: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.key == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesTab {
    Leads,
    Deals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinanceTab {
    Invoices,
    Payments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceTab {
    Gst,
    Tds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeopleTab {
    Employees,
    Freelancers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectsTab {
    Projects,
    Timesheets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminTab {
    Users,
    AuditLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Sales(SalesTab),
    Finance(FinanceTab),
    Compliance(ComplianceTab),
    People(PeopleTab),
    Projects(ProjectsTab),
    Admin(AdminTab),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Sales(SalesTab::Leads)
    }
}

impl Screen {
    pub const ALL: [Screen; 12] = [
        Screen::Sales(SalesTab::Leads),
        Screen::Sales(SalesTab::Deals),
        Screen::Finance(FinanceTab::Invoices),
        Screen::Finance(FinanceTab::Payments),
        Screen::Compliance(ComplianceTab::Gst),
        Screen::Compliance(ComplianceTab::Tds),
        Screen::People(PeopleTab::Employees),
        Screen::People(PeopleTab::Freelancers),
        Screen::Projects(ProjectsTab::Projects),
        Screen::Projects(ProjectsTab::Timesheets),
        Screen::Admin(AdminTab::Users),
        Screen::Admin(AdminTab::AuditLog),
    ];

    /// First screen of each module, in navigation order.
    pub const MODULES: [Screen; 6] = [
        Screen::Sales(SalesTab::Leads),
        Screen::Finance(FinanceTab::Invoices),
        Screen::Compliance(ComplianceTab::Gst),
        Screen::People(PeopleTab::Employees),
        Screen::Projects(ProjectsTab::Projects),
        Screen::Admin(AdminTab::Users),
    ];

    pub fn module_label(self) -> &'static str {
        match self {
            Screen::Sales(_) => "Sales",
            Screen::Finance(_) => "Finance",
            Screen::Compliance(_) => "Compliance",
            Screen::People(_) => "People",
            Screen::Projects(_) => "Projects",
            Screen::Admin(_) => "Admin",
        }
    }

    pub fn tab_label(self) -> &'static str {
        match self {
            Screen::Sales(SalesTab::Leads) => "Leads",
            Screen::Sales(SalesTab::Deals) => "Deals",
            Screen::Finance(FinanceTab::Invoices) => "Invoices",
            Screen::Finance(FinanceTab::Payments) => "Payments",
            Screen::Compliance(ComplianceTab::Gst) => "GST Returns",
            Screen::Compliance(ComplianceTab::Tds) => "TDS",
            Screen::People(PeopleTab::Employees) => "Employees",
            Screen::People(PeopleTab::Freelancers) => "Freelancers",
            Screen::Projects(ProjectsTab::Projects) => "Projects",
            Screen::Projects(ProjectsTab::Timesheets) => "Timesheets",
            Screen::Admin(AdminTab::Users) => "Users",
            Screen::Admin(AdminTab::AuditLog) => "Audit Log",
        }
    }

    /// Whether `other` belongs to the same module.
    pub fn same_module(self, other: Screen) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    /// Tabs of this screen's module.
    pub fn tabs(self) -> impl Iterator<Item = Screen> {
        Screen::ALL.into_iter().filter(move |s| s.same_module(self))
    }

    pub fn table_spec(self) -> &'static TableSpec {
        match self {
            Screen::Sales(SalesTab::Leads) => &LEADS,
            Screen::Sales(SalesTab::Deals) => &DEALS,
            Screen::Finance(FinanceTab::Invoices) => &INVOICES,
            Screen::Finance(FinanceTab::Payments) => &PAYMENTS,
            Screen::Compliance(ComplianceTab::Gst) => &GST_RETURNS,
            Screen::Compliance(ComplianceTab::Tds) => &TDS_ENTRIES,
            Screen::People(PeopleTab::Employees) => &EMPLOYEES,
            Screen::People(PeopleTab::Freelancers) => &FREELANCERS,
            Screen::Projects(ProjectsTab::Projects) => &PROJECTS,
            Screen::Projects(ProjectsTab::Timesheets) => &TIMESHEETS,
            Screen::Admin(AdminTab::Users) => &USERS,
            Screen::Admin(AdminTab::AuditLog) => &AUDIT_LOG,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.module_label(), self.tab_label())
    }
}

use ColumnKind::*;

const ID: ColumnSpec = ColumnSpec::new("id", "#", Id, 60.0);

static LEADS: TableSpec = TableSpec {
    table: "leads",
    sort_field: "created_at",
    sort_dir: SortDir::Desc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("name", "Name", Name, 160.0),
        ColumnSpec::new("company", "Company", Company, 180.0),
        ColumnSpec::new("email", "Email", Email, 220.0),
        ColumnSpec::new("stage", "Stage", Status(&["New", "Contacted", "Qualified", "Lost"]), 100.0),
        ColumnSpec::new("value", "Value", Money, 110.0).nullable(),
        ColumnSpec::new("created_at", "Created", Date, 100.0),
        ColumnSpec::new("notes", "Notes", Notes, 260.0).nullable(),
    ],
};

static DEALS: TableSpec = TableSpec {
    table: "deals",
    sort_field: "close_date",
    sort_dir: SortDir::Asc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("account", "Account", Company, 180.0),
        ColumnSpec::new("stage", "Stage", Status(&["Proposal", "Negotiation", "Won", "Lost"]), 110.0),
        ColumnSpec::new("amount", "Amount", Money, 120.0),
        ColumnSpec::new("owner", "Owner", Name, 150.0),
        ColumnSpec::new("close_date", "Close date", Date, 100.0).nullable(),
    ],
};

static INVOICES: TableSpec = TableSpec {
    table: "invoices",
    sort_field: "issued_on",
    sort_dir: SortDir::Desc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("invoice_no", "Invoice", Code("INV"), 110.0),
        ColumnSpec::new("client", "Client", Company, 180.0),
        ColumnSpec::new("amount", "Amount", Money, 120.0),
        ColumnSpec::new("status", "Status", Status(&["Draft", "Sent", "Paid", "Overdue"]), 90.0),
        ColumnSpec::new("issued_on", "Issued", Date, 100.0),
        ColumnSpec::new("due_on", "Due", Date, 100.0).nullable(),
    ],
};

static PAYMENTS: TableSpec = TableSpec {
    table: "payments",
    sort_field: "received_on",
    sort_dir: SortDir::Desc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("reference", "Reference", Code("PAY"), 110.0),
        ColumnSpec::new("client", "Client", Company, 180.0),
        ColumnSpec::new("amount", "Amount", Money, 120.0),
        ColumnSpec::new("method", "Method", Status(&["NEFT", "UPI", "Cheque", "Card"]), 90.0),
        ColumnSpec::new("received_on", "Received", Date, 100.0),
    ],
};

static GST_RETURNS: TableSpec = TableSpec {
    table: "gst_returns",
    sort_field: "period",
    sort_dir: SortDir::Desc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("period", "Period", Date, 100.0),
        ColumnSpec::new("form", "Form", Status(&["GSTR-1", "GSTR-3B", "GSTR-9"]), 90.0),
        ColumnSpec::new("taxable_value", "Taxable value", Money, 130.0),
        ColumnSpec::new("tax", "Tax", Money, 110.0),
        ColumnSpec::new("status", "Status", Status(&["Pending", "Filed", "Late"]), 90.0),
    ],
};

static TDS_ENTRIES: TableSpec = TableSpec {
    table: "tds_entries",
    sort_field: "deducted_on",
    sort_dir: SortDir::Desc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("deductee", "Deductee", Name, 160.0),
        ColumnSpec::new("section", "Section", Status(&["194C", "194J", "194H", "194I"]), 80.0),
        ColumnSpec::new("amount", "Amount", Money, 120.0),
        ColumnSpec::new("tds", "TDS", Money, 100.0),
        ColumnSpec::new("deducted_on", "Deducted", Date, 100.0),
    ],
};

static EMPLOYEES: TableSpec = TableSpec {
    table: "employees",
    sort_field: "name",
    sort_dir: SortDir::Asc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("name", "Name", Name, 160.0),
        ColumnSpec::new("email", "Email", Email, 220.0),
        ColumnSpec::new(
            "department",
            "Department",
            Status(&["Engineering", "Sales", "Finance", "Operations"]),
            110.0,
        ),
        ColumnSpec::new("joined_on", "Joined", Date, 100.0),
        ColumnSpec::new("salary", "Salary", Money, 120.0),
    ],
};

static FREELANCERS: TableSpec = TableSpec {
    table: "freelancers",
    sort_field: "name",
    sort_dir: SortDir::Asc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("name", "Name", Name, 160.0),
        ColumnSpec::new("email", "Email", Email, 220.0),
        ColumnSpec::new("skill", "Skill", Status(&["Design", "Development", "Writing", "QA"]), 110.0),
        ColumnSpec::new("hourly_rate", "Rate/h", Money, 100.0),
        ColumnSpec::new("rating", "Rating", Count { min: 1, max: 5 }, 70.0).nullable(),
    ],
};

static PROJECTS: TableSpec = TableSpec {
    table: "projects",
    sort_field: "due_on",
    sort_dir: SortDir::Asc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("code", "Code", Code("PRJ"), 100.0),
        ColumnSpec::new("client", "Client", Company, 180.0),
        ColumnSpec::new("status", "Status", Status(&["Planned", "Active", "On hold", "Done"]), 90.0),
        ColumnSpec::new("budget", "Budget", Money, 120.0),
        ColumnSpec::new("due_on", "Due", Date, 100.0).nullable(),
        ColumnSpec::new("notes", "Notes", Notes, 260.0).nullable(),
    ],
};

static TIMESHEETS: TableSpec = TableSpec {
    table: "timesheets",
    sort_field: "work_date",
    sort_dir: SortDir::Desc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("person", "Person", Name, 160.0),
        ColumnSpec::new("project", "Project", Code("PRJ"), 100.0),
        ColumnSpec::new("hours", "Hours", Count { min: 1, max: 10 }, 70.0),
        ColumnSpec::new("work_date", "Date", Date, 100.0),
        ColumnSpec::new("notes", "Notes", Notes, 260.0).nullable(),
    ],
};

static USERS: TableSpec = TableSpec {
    table: "users",
    sort_field: "email",
    sort_dir: SortDir::Asc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("email", "Email", Email, 220.0),
        ColumnSpec::new("name", "Name", Name, 160.0),
        ColumnSpec::new("role", "Role", Status(&["Admin", "Manager", "Staff", "Viewer"]), 90.0),
        ColumnSpec::new("last_login", "Last login", Timestamp, 170.0).nullable(),
    ],
};

static AUDIT_LOG: TableSpec = TableSpec {
    table: "audit_log",
    sort_field: "at",
    sort_dir: SortDir::Desc,
    id_field: "id",
    columns: &[
        ID,
        ColumnSpec::new("at", "Time", Timestamp, 170.0),
        ColumnSpec::new("actor", "Actor", Email, 200.0),
        ColumnSpec::new("action", "Action", Status(&["create", "update", "delete", "login"]), 80.0),
        ColumnSpec::new("entity", "Entity", Status(&["invoice", "lead", "user", "project"]), 90.0),
        ColumnSpec::new("detail", "Detail", Notes, 300.0).nullable(),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_screen_has_a_distinct_table() {
        let tables: HashSet<_> = Screen::ALL.iter().map(|s| s.table_spec().table).collect();
        assert_eq!(tables.len(), Screen::ALL.len());
    }

    #[test]
    fn test_sort_and_id_columns_are_displayed() {
        for screen in Screen::ALL {
            let spec = screen.table_spec();
            assert!(spec.column(spec.sort_field).is_some(), "{screen}: sort column missing");
            assert!(spec.column(spec.id_field).is_some(), "{screen}: id column missing");
        }
    }

    #[test]
    fn test_tabs_stay_within_module() {
        let finance = Screen::Finance(FinanceTab::Payments);
        let tabs: Vec<_> = finance.tabs().collect();
        assert_eq!(
            tabs,
            vec![
                Screen::Finance(FinanceTab::Invoices),
                Screen::Finance(FinanceTab::Payments)
            ]
        );
        assert!(Screen::MODULES.iter().all(|m| m.tabs().count() == 2));
    }

    #[test]
    fn test_query_selects_columns() {
        let q = Screen::Finance(FinanceTab::Invoices).table_spec().query(25);
        assert_eq!(q.table, "invoices");
        assert_eq!(q.page_size, 25);
        assert_eq!(q.sort, SortSpec::desc("issued_on"));
        assert_eq!(q.fields.as_ref().map(Vec::len), Some(7));
    }

    #[test]
    fn test_screen_serializes_for_settings() {
        let s = Screen::Admin(AdminTab::AuditLog);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<Screen>(&json).unwrap(), s);
    }
}
