pub mod agent;
pub mod answer_balancer;
pub mod completion_provider;
pub mod email_service;
pub mod question_generator;
pub mod quiz_publisher;
pub mod quiz_service;
pub mod shape_validator;
