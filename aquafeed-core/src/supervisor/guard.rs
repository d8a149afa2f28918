//! Scoped finalize guard

use crate::scheduler::finalize_outputs;
use crate::traits::{ActuatorError, ActuatorPort};

/// Borrows the actuator port for a run and finalizes it on exit
///
/// [`finish`](Self::finish) runs finalize and reports the result. If the
/// guard is dropped without `finish`, for example because the run future
/// was dropped mid-phase, `Drop` runs finalize instead and discards the
/// result.
pub struct FinalizeGuard<'a, P: ActuatorPort> {
    port: &'a mut P,
    done: bool,
}

impl<'a, P: ActuatorPort> FinalizeGuard<'a, P> {
    pub fn new(port: &'a mut P) -> Self {
        Self { port, done: false }
    }

    /// Port access for the phases
    pub fn port(&mut self) -> &mut P {
        &mut *self.port
    }

    /// Run finalize now
    pub fn finish(mut self) -> Result<(), ActuatorError> {
        self.done = true;
        finalize_outputs(&mut *self.port)
    }
}

impl<P: ActuatorPort> Drop for FinalizeGuard<'_, P> {
    fn drop(&mut self) {
        if !self.done {
            self.done = true;
            if let Err(_e) = finalize_outputs(&mut *self.port) {
                #[cfg(feature = "defmt")]
                defmt::error!("Finalize on drop failed: {}", _e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPort;
    use crate::traits::{ActuatorId, ActuatorState};

    #[test]
    fn test_finish_runs_once() {
        let mut port = MockPort::new();
        {
            let mut guard = FinalizeGuard::new(&mut port);
            guard.port().set_binary(ActuatorId::InletPump, true).unwrap();
            guard.finish().unwrap();
        }
        // 1 ON + 4 OFF + park, and no second finalize from Drop
        assert_eq!(port.log.len(), 6);
        assert_eq!(port.state(ActuatorId::InletPump), ActuatorState::Off);
    }

    #[test]
    fn test_drop_finalizes() {
        let mut port = MockPort::new();
        {
            let mut guard = FinalizeGuard::new(&mut port);
            guard.port().set_binary(ActuatorId::OutletPump, true).unwrap();
        }
        assert_eq!(port.log.len(), 6);
        assert_eq!(port.state(ActuatorId::OutletPump), ActuatorState::Off);
        assert_eq!(port.state(ActuatorId::FeederServo), ActuatorState::Parked);
    }

    #[test]
    fn test_drop_attempts_all_after_error() {
        let mut port = MockPort::failing_at(0);
        {
            let _guard = FinalizeGuard::new(&mut port);
        }
        assert_eq!(port.attempts, 5);
        assert_eq!(port.state(ActuatorId::InletPump), ActuatorState::Unknown);
        assert_eq!(port.state(ActuatorId::OutletPump), ActuatorState::Off);
        assert_eq!(port.state(ActuatorId::FeederServo), ActuatorState::Parked);
    }

    #[test]
    fn test_finish_reports_error() {
        let mut port = MockPort::failing_at(1);
        let guard = FinalizeGuard::new(&mut port);
        assert!(guard.finish().is_err());
        // Remaining writes still attempted, Drop does not retry
        assert_eq!(port.attempts, 5);
    }
}
