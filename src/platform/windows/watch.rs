//! `WM_DISPLAYCHANGE` watcher.
//!
//! Display-change broadcasts only reach top-level windows, so the watcher
//! owns a hidden one and pumps its messages on a dedicated thread for the
//! rest of the process.

use crate::error::{Error, Result};
use std::sync::mpsc;
use std::thread;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, MSG, RegisterClassW,
    SPI_SETWORKAREA, TranslateMessage, WINDOW_EX_STYLE, WM_DISPLAYCHANGE, WM_SETTINGCHANGE,
    WNDCLASSW, WS_OVERLAPPED,
};
use windows::core::{PCWSTR, w};

const CLASS_NAME: PCWSTR = w!("ScreenkeepDisplayWatcher");

/// Whether a message changes monitor geometry.
///
/// `WM_SETTINGCHANGE` is broadcast for every system setting; only the
/// work-area variant (taskbar moved or resized) counts.
fn is_display_change(msg: u32, wparam: WPARAM) -> bool {
    match msg {
        WM_DISPLAYCHANGE => true,
        WM_SETTINGCHANGE => wparam.0 == SPI_SETWORKAREA.0 as usize,
        _ => false,
    }
}

unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if is_display_change(msg, wparam) {
        log::debug!("display change message {:#x}", msg);
        crate::notify::system_notifier().hub().notify();
        return LRESULT(0);
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// Spawn the watcher thread. Returns once its window exists.
pub fn start_display_watch() -> Result<()> {
    let (ready_tx, ready_rx) = mpsc::channel();

    thread::Builder::new()
        .name("screenkeep-display-watch".into())
        .spawn(move || {
            let hwnd = match create_window() {
                Ok(hwnd) => {
                    let _ = ready_tx.send(Ok(()));
                    hwnd
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            log::info!("display change watcher running (hwnd {:?})", hwnd.0);

            let mut msg = MSG::default();
            unsafe {
                while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
        })
        .map_err(|e| Error::ThreadError(format!("failed to spawn display watcher: {}", e)))?;

    ready_rx
        .recv()
        .map_err(|_| Error::ThreadError("display watcher exited during startup".into()))?
}

fn create_window() -> Result<HWND> {
    unsafe {
        let module = GetModuleHandleW(PCWSTR::null())
            .map_err(|e| Error::Platform(format!("GetModuleHandleW failed: {}", e)))?;
        let hinstance = HINSTANCE(module.0);

        let wc = WNDCLASSW {
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };
        if RegisterClassW(&wc) == 0 {
            return Err(Error::Platform("RegisterClassW failed".into()));
        }

        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            w!("screenkeep"),
            WS_OVERLAPPED,
            0,
            0,
            0,
            0,
            None,
            None,
            Some(hinstance),
            None,
        )
        .map_err(|e| Error::Platform(format!("CreateWindowExW failed: {}", e)))
    }
}
