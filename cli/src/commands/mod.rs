mod browse;
mod helpers;
mod list;
mod recipe;
mod transfer;

pub(crate) use browse::cmd_browse;
pub(crate) use helpers::query_from_filters;
pub(crate) use list::cmd_list;
pub(crate) use recipe::{cmd_add, cmd_delete, cmd_edit, cmd_favorite, cmd_show};
pub(crate) use transfer::{cmd_export, cmd_import};
