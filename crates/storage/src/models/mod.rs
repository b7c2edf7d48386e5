mod athlete;
mod athlete_registration;
mod competition;

pub use athlete::Athlete;
pub use athlete_registration::AthleteRegistration;
pub use competition::Competition;
