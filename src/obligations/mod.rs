pub(crate) mod installment_calculator;
pub(crate) mod obligations_constants;
pub(crate) mod obligations_errors;
pub(crate) mod obligations_model;
pub(crate) mod obligations_repository;
pub(crate) mod obligations_service;
pub(crate) mod obligations_traits;
pub(crate) mod status_calculator;

pub use installment_calculator::{split_total, InstallmentPeriod};
pub use obligations_constants::*;
pub use obligations_errors::ObligationError;
pub use obligations_model::{
    NewObligation, Obligation, ObligationIntegratedView, ObligationStatus, ObligationUpdate,
    PaymentType,
};
pub use obligations_repository::ObligationRepository;
pub use obligations_service::ObligationService;
pub use obligations_traits::{ObligationRepositoryTrait, ObligationServiceTrait};
pub use status_calculator::derive_status;
