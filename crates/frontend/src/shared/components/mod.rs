pub mod date_input;
pub mod filter_panel;
pub mod form_field;
pub mod option_select;
pub mod pagination_controls;
pub mod responsive_table;
pub mod stat_card;
pub mod status_badge;
pub mod table_checkbox;
