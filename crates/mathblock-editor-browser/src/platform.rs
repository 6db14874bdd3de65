//! Platform detection for the device class hint.
//!
//! Detection is a one-shot read of the navigator; hosts that know better can
//! pass their own `DeviceClass` instead.

use mathblock_editor_core::DeviceClass;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    pub ios: bool,
    pub mac: bool,
    pub android: bool,
    pub mobile: bool,
}

impl Platform {
    /// Touch devices get the on-screen math keyboard.
    pub fn device_class(&self) -> DeviceClass {
        if self.ios || self.android || self.mobile {
            DeviceClass::Touch
        } else {
            DeviceClass::Pointer
        }
    }

    /// Classify from a user agent string, platform string and touch point count.
    pub fn from_navigator_parts(user_agent: &str, platform: &str, max_touch_points: i32) -> Self {
        let user_agent = user_agent.to_lowercase();
        let platform_str = platform.to_lowercase();

        // iOS detection: iPhone/iPad/iPod in UA, or Mac platform with touch
        let ios = user_agent.contains("iphone")
            || user_agent.contains("ipad")
            || user_agent.contains("ipod")
            || (platform_str.contains("mac") && max_touch_points > 0);

        let mac = platform_str.contains("mac") && !ios;
        let android = user_agent.contains("android");
        let mobile =
            ios || android || user_agent.contains("mobile") || user_agent.contains("iemobile");

        Platform {
            ios,
            mac,
            android,
            mobile,
        }
    }
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub fn detect_platform() -> Platform {
    let Some(window) = web_sys::window() else {
        return Platform::default();
    };
    let navigator = window.navigator();
    Platform::from_navigator_parts(
        &navigator.user_agent().unwrap_or_default(),
        &navigator.platform().unwrap_or_default(),
        navigator.max_touch_points(),
    )
}

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub fn detect_platform() -> Platform {
    Platform::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_is_pointer() {
        let p = Platform::from_navigator_parts(
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
            "Linux x86_64",
            0,
        );
        assert_eq!(p.device_class(), DeviceClass::Pointer);
    }

    #[test]
    fn test_ipad_with_desktop_ua_is_touch() {
        let p = Platform::from_navigator_parts(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15",
            "MacIntel",
            5,
        );
        assert!(p.ios);
        assert!(!p.mac);
        assert_eq!(p.device_class(), DeviceClass::Touch);
    }

    #[test]
    fn test_android_is_touch() {
        let p = Platform::from_navigator_parts(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari/537.36",
            "Linux armv8l",
            5,
        );
        assert!(p.android);
        assert_eq!(p.device_class(), DeviceClass::Touch);
    }
}
