pub mod payment_method_writer;
