//! Dashboard UI strings per supported locale
//!
//! Every locale fills the same [`DashboardStrings`] struct, so a missing key
//! is a compile error rather than a blank label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    English,
    Hindi,
    Marathi,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::English, Locale::Hindi, Locale::Marathi];

    pub fn name(self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::Hindi => "Hindi",
            Locale::Marathi => "Marathi",
        }
    }

    pub fn strings(self) -> &'static DashboardStrings {
        match self {
            Locale::English => &ENGLISH,
            Locale::Hindi => &HINDI,
            Locale::Marathi => &MARATHI,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unsupported locale '{}' (expected one of: English, Hindi, Marathi)",
                    s
                )
            })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DashboardStrings {
    pub portal: &'static str,
    pub subtitle: &'static str,
    pub dashboard: &'static str,
    pub academics: &'static str,
    pub schedule: &'static str,
    pub attendance: &'static str,
    pub marks: &'static str,
    pub exams: &'static str,
    pub profile: &'static str,
    pub settings: &'static str,
    pub logout: &'static str,
    pub hello: &'static str,
    pub today_is: &'static str,
    pub you_have: &'static str,
    pub classes_today: &'static str,
    pub total_students: &'static str,
    pub active_exams: &'static str,
    pub todays_schedule: &'static str,
    pub view_full: &'static str,
    pub no_classes: &'static str,
    pub check_schedule: &'static str,
    pub quick_actions: &'static str,
    pub manage_time: &'static str,
    pub class_time: &'static str,
    pub subject: &'static str,
    pub batch: &'static str,
    pub room: &'static str,
}

static ENGLISH: DashboardStrings = DashboardStrings {
    portal: "Faculty Portal",
    subtitle: "Manage your classes and students efficiently.",
    dashboard: "Dashboard",
    academics: "Academics",
    schedule: "My Schedule",
    attendance: "Mark Attendance",
    marks: "Upload Marks",
    exams: "Manage Exams",
    profile: "Profile",
    settings: "Settings",
    logout: "Logout",
    hello: "Hello, Professor!",
    today_is: "It's",
    you_have: "You have",
    classes_today: "Classes Today",
    total_students: "Total Students",
    active_exams: "Scheduled Exams",
    todays_schedule: "Today's Schedule",
    view_full: "View Full Week",
    no_classes: "No classes scheduled for",
    check_schedule: "Check 'My Schedule' to add classes.",
    quick_actions: "Quick Actions",
    manage_time: "Manage Timetable",
    class_time: "Class Time",
    subject: "Subject",
    batch: "Batch",
    room: "Room",
};

static HINDI: DashboardStrings = DashboardStrings {
    portal: "शिक्षक पोर्टल",
    subtitle: "अपनी कक्षाओं और छात्रों का प्रबंधन करें।",
    dashboard: "डैशबोर्ड",
    academics: "शैक्षणिक",
    schedule: "मेरी समय सारिणी",
    attendance: "उपस्थिति दर्ज करें",
    marks: "अंक अपलोड करें",
    exams: "परीक्षा प्रबंधन",
    profile: "प्रोफ़ाइल",
    settings: "सेटिंग्स",
    logout: "लॉग आउट",
    hello: "नमस्ते, प्रोफेसर!",
    today_is: "आज",
    you_have: "आपकी",
    classes_today: "आज की कक्षाएं",
    total_students: "कुल छात्र",
    active_exams: "निर्धारित परीक्षाएँ",
    todays_schedule: "आज की समय सारिणी",
    view_full: "पूरा सप्ताह देखें",
    no_classes: "के लिए कोई कक्षा निर्धारित नहीं है",
    check_schedule: "कक्षाएं जोड़ने के लिए 'मेरी समय सारिणी' देखें।",
    quick_actions: "त्वरित कार्य",
    manage_time: "समय सारिणी प्रबंधन",
    class_time: "कक्षा का समय",
    subject: "विषय",
    batch: "बैच",
    room: "कक्ष",
};

static MARATHI: DashboardStrings = DashboardStrings {
    portal: "प्राध्यापक पोर्टल",
    subtitle: "आपले वर्ग आणि विद्यार्थी प्रभावीपणे व्यवस्थापित करा.",
    dashboard: "डॅशबोर्ड",
    academics: "शैक्षणिक",
    schedule: "वेळापत्रक",
    attendance: "हजेरी नोंदवा",
    marks: "गुण अपलोड करा",
    exams: "परीक्षा व्यवस्थापन",
    profile: "प्रोफाइल",
    settings: "सेटिंग्ज",
    logout: "लॉग आउट",
    hello: "नमस्कार, सर!",
    today_is: "आज",
    you_have: "आज तुमचे",
    classes_today: "आजचे वर्ग",
    total_students: "एकूण विद्यार्थी",
    active_exams: "नियोजित परीक्षा",
    todays_schedule: "आजचे वेळापत्रक",
    view_full: "पूर्ण आठवडा पहा",
    no_classes: "यासाठी कोणतेही वर्ग नाहीत",
    check_schedule: "वर्ग जोडण्यासाठी 'वेळापत्रक' तपासा.",
    quick_actions: "क्विक ऍक्शन्स",
    manage_time: "वेळापत्रक व्यवस्थापन",
    class_time: "वर्गाची वेळ",
    subject: "विषय",
    batch: "तुकडी",
    room: "वर्गखोली",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("hindi".parse::<Locale>().unwrap(), Locale::Hindi);
        assert_eq!(" Marathi ".parse::<Locale>().unwrap(), Locale::Marathi);
        assert!("Klingon".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Locale::default().strings().portal, "Faculty Portal");
    }

    #[test]
    fn test_locales_are_distinct() {
        assert_ne!(Locale::English.strings(), Locale::Hindi.strings());
        assert_ne!(Locale::Hindi.strings(), Locale::Marathi.strings());
        for locale in Locale::ALL {
            assert!(!locale.strings().todays_schedule.is_empty());
        }
    }
}
