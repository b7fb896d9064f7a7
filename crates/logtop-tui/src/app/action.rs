/// All possible actions in the top view (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Quit after Ctrl+C
    Interrupt,

    // UI toggles
    ToggleHelp,
    TogglePause,

    /// Clear the terminal and draw everything again
    Redraw,
}
