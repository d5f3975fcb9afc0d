//! SQL objects compiled into the binary, one bundle per backend.

use super::ResourceBundle;
use crate::db::Backend;

pub fn postgres() -> ResourceBundle {
    ResourceBundle::new()
        .with(
            "StoredProcedures.public.process_users.sql",
            include_str!("../../resources/postgres/StoredProcedures/public.process_users.sql"),
        )
        .with(
            "Functions.public.user_dashboard_count.sql",
            include_str!("../../resources/postgres/Functions/public.user_dashboard_count.sql"),
        )
        .with(
            "Views.public.active_users.sql",
            include_str!("../../resources/postgres/Views/public.active_users.sql"),
        )
}

pub fn sqlite() -> ResourceBundle {
    ResourceBundle::new()
        .with(
            "Views.main.active_users.sql",
            include_str!("../../resources/sqlite/Views/main.active_users.sql"),
        )
        .with(
            "Views.main.user_dashboard_counts.sql",
            include_str!("../../resources/sqlite/Views/main.user_dashboard_counts.sql"),
        )
}

pub fn for_backend(backend: Backend) -> ResourceBundle {
    match backend {
        Backend::Postgres => postgres(),
        Backend::Sqlite => sqlite(),
    }
}
