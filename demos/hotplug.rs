use keybindings::backends::virtual_input::{RecordingHost, VirtualDevice, VirtualKeyboard};
use keybindings::{
    Axis, BindingsConfig, DeviceEvent, DeviceHandle, DeviceListener, LastConnectedAssigner,
    VirtualInputConfig,
};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> keybindings::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .init();

    let config = BindingsConfig::new()
        .with_input(
            "gameplay",
            "steer",
            VirtualInputConfig::new("axis", &["gamepad", "flight_stick", "keyboard"])
                .candidate("gamepad", "left_x:deadzone=0.1")
                .candidate("flight_stick", "roll")
                .candidate("keyboard", "a,d"),
        )
        .with_input(
            "gameplay",
            "fire",
            VirtualInputConfig::new("trigger", &["gamepad", "flight_stick", "keyboard"])
                .candidate("gamepad", "right_trigger:button>=0.5")
                .candidate("flight_stick", "trigger")
                .candidate("keyboard", "space"),
        );

    let keyboard = Arc::new(VirtualKeyboard::new());
    let host = RecordingHost::new();
    let mut listener =
        DeviceListener::new(&config, LastConnectedAssigner::new(host.clone()), keyboard.clone())?;

    // The "host" thread plugs devices in and out while the main loop polls.
    let (tx, rx) = mpsc::sync_channel::<DeviceEvent>(16);
    let feeder = thread::spawn(move || {
        let stick = VirtualDevice::new("hid:231d:0200", "Flight Stick", "flight_stick");
        stick.set_axis(Axis::Roll, -0.6);
        stick.press_button("trigger");
        let stick: DeviceHandle = Arc::new(stick);

        thread::sleep(Duration::from_millis(50));
        let _ = tx.send(DeviceEvent::Connected(stick.clone()));
        thread::sleep(Duration::from_millis(100));
        let _ = tx.send(DeviceEvent::Disconnected(stick));
    });

    keyboard.press("d");
    let frame = Duration::from_millis(20);
    for tick in 0..12 {
        listener.drain_events(&rx);
        let state = listener.read_context("gameplay", None, frame)?;
        println!(
            "[{tick:02}] devices={:?} steer={:?} fire={:?}",
            listener.available_devices(None).keys().collect::<Vec<_>>(),
            state["steer"],
            state["fire"],
        );
        thread::sleep(frame);
    }

    let _ = feeder.join();
    println!("host calls: {:?}", host.calls());
    Ok(())
}
