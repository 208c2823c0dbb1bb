#![no_std]
#![no_main]

use db9_adapter_rp2040::{
    serve_host_port, Adapter, ControllerInput, DualShockInput, Fault, HostLine, Indicator,
    InputError, Mode, Pattern, PortContext, ProbeOutcome, FAULT_REFRESH_INTERVAL, POLL_INTERVAL,
};
use db9_core::DirectionLines;
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Ticker};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

/// Executor for the port task. Preempts the polling loop.
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

/// State shared between the polling loop and the port task.
static PORT_CONTEXT: StaticCell<PortContext> = StaticCell::new();

/// Wakes the port task after new button line levels are published.
static LINES_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, ()>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("DB9 adapter starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let ctx: &'static PortContext = PORT_CONTEXT.init(PortContext::new());
    let signal: &'static Signal<CriticalSectionRawMutex, ()> = LINES_SIGNAL.init(Signal::new());

    // --- LEDs ---
    let mut ready_led = Output::new(p.PIN_25, Level::Low);
    let mode_led = Output::new(p.PIN_15, Level::Low);

    // --- Host port ---
    let directions = DirectionLines::new(
        HostLine::new(Flex::new(p.PIN_2)),
        HostLine::new(Flex::new(p.PIN_3)),
        HostLine::new(Flex::new(p.PIN_4)),
        HostLine::new(Flex::new(p.PIN_5)),
    );
    let button1 = HostLine::new(Flex::new(p.PIN_6));
    let button2 = HostLine::new(Flex::new(p.PIN_7));
    let strobe = Input::new(p.PIN_8, Pull::Up);

    // --- Controller port ---
    let input = DualShockInput::new(
        Output::new(p.PIN_18, Level::High), // CLK
        Output::new(p.PIN_19, Level::High), // CMD
        Output::new(p.PIN_17, Level::High), // ATT
        Input::new(p.PIN_16, Pull::Up),     // DAT
    );
    let mut input = match input {
        Ok(input) => input,
        Err(e) => {
            error!("Controller port setup failed: {:?}", e);
            signal_fault(mode_led, Fault::CommunicationError).await
        }
    };

    let outcome = input.probe().await;
    match outcome {
        ProbeOutcome::Supported(kind) => info!("Controller found: {:?}", kind),
        ProbeOutcome::Unrecognized => warn!("Unrecognized controller, continuing"),
        _ => {}
    }
    if let Some(fault) = outcome.fault() {
        error!("Controller unusable: {:?}", outcome);
        signal_fault(mode_led, fault).await;
    }
    ready_led.set_high();

    // Port task runs above thread mode so edge handling preempts polling
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(host_port_task(ctx, strobe, button1, button2, signal).unwrap());

    spawner.spawn(polling_task(input, ctx, directions, signal, mode_led).unwrap());

    info!("DB9 adapter initialized, joystick mode active");
}

/// Port task - serves the mode-select edge and both button lines.
#[embassy_executor::task]
async fn host_port_task(
    ctx: &'static PortContext,
    strobe: Input<'static>,
    button1: HostLine<'static>,
    button2: HostLine<'static>,
    signal: &'static Signal<CriticalSectionRawMutex, ()>,
) {
    serve_host_port(ctx, strobe, button1, button2, signal).await
}

/// Polling task - one adapter cycle per tick.
#[embassy_executor::task]
async fn polling_task(
    mut input: DualShockInput<'static>,
    ctx: &'static PortContext,
    mut directions: DirectionLines<HostLine<'static>>,
    signal: &'static Signal<CriticalSectionRawMutex, ()>,
    mut mode_led: Output<'static>,
) {
    let mut adapter = Adapter::new();
    let mut indicator = Indicator::new(Pattern::for_mode(Mode::Joystick), Instant::now());
    let mut last_error: Option<InputError> = None;
    let mut ticker = Ticker::every(POLL_INTERVAL);

    loop {
        let report = adapter
            .cycle(&mut input, ctx, &mut directions, Instant::now)
            .await;
        let now = Instant::now();

        if report.input_error != last_error {
            match report.input_error {
                Some(e) => warn!("Controller read failed: {:?}", e),
                None => info!("Controller read recovered"),
            }
            last_error = report.input_error;
        }

        if let Some(transition) = report.transition {
            info!("Mode {:?} -> {:?}", transition.from, transition.to);
            indicator.set_pattern(Pattern::for_mode(transition.to), now);
        }

        if let Some(profile) = report.profile_ack {
            info!("Profile selected: {:?}", profile);
            indicator.acknowledge(profile.ordinal(), now);
        }

        if report.buttons_published || report.transition.is_some() {
            signal.signal(());
        }

        mode_led.set_level(Level::from(indicator.level(now)));
        ticker.next().await;
    }
}

/// Blink the fault pattern forever. Only a reset recovers.
async fn signal_fault(mut led: Output<'static>, fault: Fault) -> ! {
    let mut indicator = Indicator::new(Pattern::for_fault(fault), Instant::now());
    let mut ticker = Ticker::every(FAULT_REFRESH_INTERVAL);
    loop {
        led.set_level(Level::from(indicator.level(Instant::now())));
        ticker.next().await;
    }
}
