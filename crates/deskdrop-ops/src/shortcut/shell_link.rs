//! Windows `.lnk` shortcuts through the shell's `IShellLinkW`.

use deskdrop_core::DropError;
use windows::core::{Interface, HSTRING};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
    COINIT_APARTMENTTHREADED,
};
use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

use super::{DescriptionStatus, ShortcutBackend, ShortcutLink};

/// Writes native shell links.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLinkBackend;

impl ShellLinkBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Balances a successful `CoInitializeEx` on the current thread.
struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    fn new() -> Self {
        // RPC_E_CHANGED_MODE means COM is already up in another mode, which is usable
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        Self {
            initialized: hr.is_ok(),
        }
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { CoUninitialize() };
        }
    }
}

fn link_error(path: &std::path::Path, error: windows::core::Error) -> DropError {
    DropError::io(path, std::io::Error::other(error.to_string()))
}

impl ShortcutBackend for ShellLinkBackend {
    fn extension(&self) -> &'static str {
        "lnk"
    }

    fn create(&self, link: &ShortcutLink<'_>) -> Result<DescriptionStatus, DropError> {
        let _com = ComGuard::new();
        let fail = |e| link_error(link.path, e);

        unsafe {
            let shell_link: IShellLinkW =
                CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).map_err(fail)?;

            shell_link
                .SetPath(&HSTRING::from(link.target.as_os_str()))
                .map_err(fail)?;
            shell_link
                .SetWorkingDirectory(&HSTRING::from(link.working_dir.as_os_str()))
                .map_err(fail)?;

            let status = match link.description {
                None => DescriptionStatus::NotRequested,
                Some(description) => match shell_link.SetDescription(&HSTRING::from(description)) {
                    Ok(()) => DescriptionStatus::Applied,
                    Err(e) => DescriptionStatus::Ignored(DropError::PlatformLink {
                        path: link.path.to_path_buf(),
                        message: e.to_string(),
                    }),
                },
            };

            let file: IPersistFile = shell_link.cast().map_err(fail)?;
            file.Save(&HSTRING::from(link.path.as_os_str()), true)
                .map_err(fail)?;

            Ok(status)
        }
    }
}
