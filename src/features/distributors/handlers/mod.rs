pub mod admin_handler;
pub mod public_handler;

pub use admin_handler::{
    __path_create_distributor, __path_delete_distributor, __path_list_all_distributors,
    __path_update_distributor, create_distributor, delete_distributor, list_all_distributors,
    update_distributor,
};
pub use public_handler::{
    __path_get_map, __path_get_suggestions, __path_list_distributors, get_map, get_suggestions,
    list_distributors,
};
