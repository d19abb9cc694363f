use crate::config::{Config, Environment};
use crate::payments::moolre::MoolrePaymentProcessor;
use crate::payments::test::TestPaymentProcessor;
use crate::payments::PaymentProcessor;

pub struct ServiceLocator {
    config: Config,
}

impl ServiceLocator {
    pub fn new(config: &Config) -> ServiceLocator {
        ServiceLocator {
            config: config.clone(),
        }
    }

    pub fn create_payment_processor(&self) -> Box<dyn PaymentProcessor> {
        match self.config.environment {
            Environment::Test => Box::new(TestPaymentProcessor),
            _ => Box::new(MoolrePaymentProcessor::new(self.config.moolre_client())),
        }
    }
}
