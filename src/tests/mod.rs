#[path = "admin_login.test.rs"]
mod admin_login;
#[path = "attachment.test.rs"]
mod attachment;
#[path = "create_atividade.test.rs"]
mod create_atividade;
#[path = "delete_atividade.test.rs"]
mod delete_atividade;
#[path = "update_atividade.test.rs"]
mod update_atividade;
#[path = "views.test.rs"]
mod views;
