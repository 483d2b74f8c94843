pub mod channel_list;
pub mod header;
pub mod recording_grid;
pub mod service_panel;
pub mod settings_form;
pub mod upload_modal;
