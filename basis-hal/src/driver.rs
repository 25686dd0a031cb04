//! Generic driver lifecycle
//!
//! Every peripheral, device and system driver is wrapped in a [`Driver`],
//! which stages settings, runs the driver specific initialization and commits
//! the staged settings once that succeeds.
//!
//! ```
//! use basis_hal::driver::{Driver, Initialize};
//!
//! #[derive(Default)]
//! struct Led {
//!     level: u8,
//! }
//!
//! impl Initialize for Led {
//!     type Settings = u8;
//!     type Error = ();
//!
//!     fn driver_initialize(&mut self, brightness: &u8) -> Result<(), ()> {
//!         self.level = *brightness;
//!         Ok(())
//!     }
//! }
//!
//! let mut led = Driver::new(Led::default());
//! *led.settings() = 42;
//! led.initialize().unwrap();
//! assert!(led.is_initialized());
//! assert_eq!(*led.initialized_settings(), 42);
//! ```

use basis_hal_common::error::{ResultExt, Tagged};

/// Tag attached to errors raised by [`Driver::initialize`].
pub const SETUP: &str = "setup";

/// Driver specific initialization.
///
/// Drivers without generic settings use `()` as their settings.
pub trait Initialize {
    /// Generic settings of the driver, for example baud rate, stop bits and
    /// parity for a UART.
    type Settings: Clone + Default;

    /// Error returned when the hardware cannot be set up.
    type Error;

    /// Apply `settings` to the hardware and enable it.
    ///
    /// This runs on every call to [`Driver::initialize`]; skipping redundant
    /// hardware reconfiguration is up to the implementation.
    fn driver_initialize(&mut self, settings: &Self::Settings) -> Result<(), Self::Error>;
}

/// Lifecycle state of a [`Driver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Never initialized, or reset with [`Driver::set_as_uninitialized`].
    Uninitialized,
    /// The last call to [`Driver::initialize`] succeeded.
    Initialized,
}

/// Owns a driver together with its staged and committed settings.
///
/// A `Driver` is not `Clone`: it owns its settings outright and is the only
/// handle to the peripheral it wraps.
pub struct Driver<P: Initialize> {
    peripheral: P,
    settings: P::Settings,
    initialized_settings: P::Settings,
    state: State,
}

impl<P: Initialize> Driver<P> {
    /// Wrap `peripheral` with default settings, uninitialized.
    pub fn new(peripheral: P) -> Self {
        Driver {
            peripheral,
            settings: P::Settings::default(),
            initialized_settings: P::Settings::default(),
            state: State::Uninitialized,
        }
    }

    /// Initialize the driver with the staged settings.
    ///
    /// On success the staged settings are committed to
    /// [`initialized_settings`](Self::initialized_settings) and the driver is
    /// [`State::Initialized`]. On failure nothing is committed, the driver is
    /// left [`State::Uninitialized`] and the driver's error is returned tagged
    /// with [`SETUP`].
    pub fn initialize(&mut self) -> Result<(), Tagged<P::Error>> {
        self.state = State::Uninitialized;

        if let Err(error) = self.peripheral.driver_initialize(&self.settings).tag(SETUP) {
            #[cfg(feature = "defmt")]
            defmt::warn!("driver initialization failed");
            return Err(error);
        }

        self.initialized_settings = self.settings.clone();
        self.state = State::Initialized;

        #[cfg(feature = "defmt")]
        defmt::debug!("driver initialized");
        Ok(())
    }

    /// Mark the driver as uninitialized so it can be initialized again with
    /// new settings. The committed settings are left untouched.
    pub fn set_as_uninitialized(&mut self) {
        self.state = State::Uninitialized;
    }

    /// Whether the last [`initialize`](Self::initialize) succeeded and the
    /// driver has not been reset since.
    pub fn is_initialized(&self) -> bool {
        self.state == State::Initialized
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Staged settings, applied by the next [`initialize`](Self::initialize).
    pub fn settings(&mut self) -> &mut P::Settings {
        &mut self.settings
    }

    /// Settings used by the latest successful initialization.
    ///
    /// Only meaningful while [`is_initialized`](Self::is_initialized) is
    /// true; otherwise these are stale or default values.
    pub fn initialized_settings(&self) -> &P::Settings {
        &self.initialized_settings
    }

    /// Shared access to the wrapped driver.
    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// Exclusive access to the wrapped driver.
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.peripheral
    }

    /// Releases the wrapped driver.
    pub fn free(self) -> P {
        self.peripheral
    }
}
