pub mod wg_command;
