pub mod smtp_delivery;
