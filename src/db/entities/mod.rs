pub mod punishments;
