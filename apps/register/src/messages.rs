//! # Messages
//!
//! Every string the register shows to a cashier, in Japanese (default) and
//! English. Screens never hold literal display text; they render through
//! [`text`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Message::PurchaseFailed  ──┐                                           │
//! │  Message::Processing      ──┼──► text(locale, msg) ──► String           │
//! │  Message::Camera(&err)    ──┘         │                                 │
//! │                                       ├── Locale::Ja (default)          │
//! │                                       └── Locale::En                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::CameraError;

/// Display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ja" | "ja-jp" | "ja_jp" => Ok(Locale::Ja),
            "en" | "en-us" | "en_us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unknown locale: {}", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Ja => write!(f, "ja"),
            Locale::En => write!(f, "en"),
        }
    }
}

/// A user-visible message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message<'a> {
    /// App title bar, built from the configured store name.
    AppTitle(&'a str),

    // ---- Confirmation screen ----
    ConfirmTitle,
    TotalLabel,
    SubmitButton,
    CancelButton,
    /// Submit label while the purchase call is in flight.
    Processing,
    /// Blocking notice after a failed purchase call.
    PurchaseFailed,

    // ---- Scanner screen ----
    ScannerTitle,
    CameraStarting,
    ScanPrompt,
    RetryButton,
    CloseButton,
    /// Localized description of a camera failure.
    Camera(&'a CameraError),
}

/// Renders `message` in `locale`.
pub fn text(locale: Locale, message: Message<'_>) -> String {
    match locale {
        Locale::Ja => ja(message),
        Locale::En => en(message),
    }
}

fn ja(message: Message<'_>) -> String {
    match message {
        Message::AppTitle(store) => format!("{} レジアプリ", store),
        Message::ConfirmTitle => "購入確認".into(),
        Message::TotalLabel => "合計金額（税込）".into(),
        Message::SubmitButton => "OK".into(),
        Message::CancelButton => "キャンセル".into(),
        Message::Processing => "処理中...".into(),
        Message::PurchaseFailed => "購入処理に失敗しました".into(),
        Message::ScannerTitle => "バーコードスキャナー".into(),
        Message::CameraStarting => "カメラを起動中...".into(),
        Message::ScanPrompt => "カメラでバーコードをスキャンしてください".into(),
        Message::RetryButton => "再試行".into(),
        Message::CloseButton => "閉じる".into(),
        Message::Camera(err) => match err {
            CameraError::PermissionDenied => {
                "カメラの使用が許可されていません。ブラウザの設定でカメラの使用を許可してください。"
                    .into()
            }
            CameraError::DeviceNotFound => {
                "カメラデバイスが見つかりません。カメラが接続されているか確認してください。".into()
            }
            CameraError::DeviceBusy => {
                "カメラが他のアプリケーションで使用中です。他のアプリを閉じてから再試行してください。"
                    .into()
            }
            CameraError::Overconstrained => "要求されたカメラ設定に対応していません。".into(),
            CameraError::Unsupported => {
                "カメラの起動に失敗しました: このブラウザはカメラAPIに対応していません".into()
            }
            CameraError::NoDevice => {
                "カメラの起動に失敗しました: 利用可能なカメラデバイスが見つかりません".into()
            }
            CameraError::Other { message, .. } if message.is_empty() => {
                "カメラの起動に失敗しました".into()
            }
            CameraError::Other { message, .. } => {
                format!("カメラの起動に失敗しました: {}", message)
            }
        },
    }
}

fn en(message: Message<'_>) -> String {
    match message {
        Message::AppTitle(store) => format!("{} Register", store),
        Message::ConfirmTitle => "Confirm Purchase".into(),
        Message::TotalLabel => "Total (tax included)".into(),
        Message::SubmitButton => "OK".into(),
        Message::CancelButton => "Cancel".into(),
        Message::Processing => "Processing...".into(),
        Message::PurchaseFailed => "The purchase could not be completed".into(),
        Message::ScannerTitle => "Barcode Scanner".into(),
        Message::CameraStarting => "Starting camera...".into(),
        Message::ScanPrompt => "Point the camera at a barcode".into(),
        Message::RetryButton => "Retry".into(),
        Message::CloseButton => "Close".into(),
        Message::Camera(err) => match err {
            CameraError::PermissionDenied => {
                "Camera access was denied. Allow camera use in the browser settings.".into()
            }
            CameraError::DeviceNotFound => {
                "No camera device was found. Check that a camera is connected.".into()
            }
            CameraError::DeviceBusy => {
                "The camera is in use by another application. Close it and try again.".into()
            }
            CameraError::Overconstrained => {
                "The camera does not support the requested settings.".into()
            }
            CameraError::Unsupported => {
                "Failed to start the camera: this browser does not support the camera API".into()
            }
            CameraError::NoDevice => {
                "Failed to start the camera: no camera device is available".into()
            }
            CameraError::Other { message, .. } if message.is_empty() => {
                "Failed to start the camera".into()
            }
            CameraError::Other { message, .. } => {
                format!("Failed to start the camera: {}", message)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_japanese() {
        assert_eq!(Locale::default(), Locale::Ja);
        assert_eq!(
            text(Locale::default(), Message::PurchaseFailed),
            "購入処理に失敗しました"
        );
        assert_eq!(text(Locale::Ja, Message::Processing), "処理中...");
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            text(Locale::Ja, Message::AppTitle("POP-UP STORE")),
            "POP-UP STORE レジアプリ"
        );
        assert_eq!(
            text(Locale::En, Message::AppTitle("Harbor Market")),
            "Harbor Market Register"
        );
        assert_eq!(text(Locale::Ja, Message::ScannerTitle), "バーコードスキャナー");
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("ja".parse::<Locale>().unwrap(), Locale::Ja);
        assert_eq!("EN-us".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_camera_messages() {
        assert_eq!(
            text(Locale::Ja, Message::Camera(&CameraError::DeviceBusy)),
            "カメラが他のアプリケーションで使用中です。他のアプリを閉じてから再試行してください。"
        );
        assert_eq!(
            text(
                Locale::Ja,
                Message::Camera(&CameraError::other(Some("AbortError"), "timeout"))
            ),
            "カメラの起動に失敗しました: timeout"
        );
        assert_eq!(
            text(Locale::Ja, Message::Camera(&CameraError::other(None, ""))),
            "カメラの起動に失敗しました"
        );
        assert_eq!(
            text(Locale::En, Message::Camera(&CameraError::NoDevice)),
            "Failed to start the camera: no camera device is available"
        );
    }

    #[test]
    fn test_every_message_has_text() {
        let messages = [
            Message::AppTitle("POP-UP STORE"),
            Message::ConfirmTitle,
            Message::TotalLabel,
            Message::SubmitButton,
            Message::CancelButton,
            Message::Processing,
            Message::PurchaseFailed,
            Message::ScannerTitle,
            Message::CameraStarting,
            Message::ScanPrompt,
            Message::RetryButton,
            Message::CloseButton,
        ];
        for locale in [Locale::Ja, Locale::En] {
            for message in messages {
                assert!(!text(locale, message).is_empty(), "{:?}", message);
            }
        }
    }
}
