pub mod subscription_models;
