pub mod off_policy;
