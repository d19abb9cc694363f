pub use self::service_locator::ServiceLocator;

mod service_locator;
