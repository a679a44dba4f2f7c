use ringmask::{HexColor, RingKind, RingParameters};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Commands accepted on the control socket, one per line.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Show,
    Hide,
    /// Hide and detach the widget; the next `show` puts it back.
    Dismiss,
    Start,
    Stop,
    Simulate,
    Progress(f64),
    Title(String),
    Params(RingKind, RingParameters),
    Ring(RingKind, RingSetting),
    ConfigReload,
}

/// A single ring parameter, set on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingSetting {
    Color1(HexColor),
    Color2(HexColor),
    Blend(f64),
    Radius(f64),
    Width(f64),
}

impl RingSetting {
    fn parse(field: &str, value: &str) -> Result<Self, CommandError> {
        let invalid = || CommandError::InvalidArgument("ring", value.to_string());
        let color = || value.parse::<HexColor>().map_err(|_| invalid());
        let number = || value.parse::<f64>().map_err(|_| invalid());
        match field {
            "color1" => color().map(Self::Color1),
            "color2" => color().map(Self::Color2),
            "blend" => number().map(Self::Blend),
            "radius" => number().map(Self::Radius),
            "width" => number().map(Self::Width),
            other => Err(CommandError::InvalidArgument("ring", other.to_string())),
        }
    }
}

impl fmt::Display for RingSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color1(c) => write!(f, "color1 {}", c),
            Self::Color2(c) => write!(f, "color2 {}", c),
            Self::Blend(v) => write!(f, "blend {}", v),
            Self::Radius(v) => write!(f, "radius {}", v),
            Self::Width(v) => write!(f, "width {}", v),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),
    #[error("invalid argument for '{0}': {1}")]
    InvalidArgument(&'static str, String),
}

impl FromStr for AppEvent {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => Err(CommandError::Empty),
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "dismiss" => Ok(Self::Dismiss),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "simulate" => Ok(Self::Simulate),
            "reload" => Ok(Self::ConfigReload),
            "progress" => rest
                .parse::<f64>()
                .map(Self::Progress)
                .map_err(|_| CommandError::InvalidArgument("progress", rest.to_string())),
            "title" => Ok(Self::Title(rest.to_string())),
            "params" => parse_params(rest),
            "ring" => parse_ring(rest),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_params(rest: &str) -> Result<AppEvent, CommandError> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    let [kind, color1, color2, blend, radius, width] = args.as_slice() else {
        return Err(CommandError::MissingArgument("params"));
    };
    let invalid = |s: &str| CommandError::InvalidArgument("params", s.to_string());

    let kind = kind.parse::<RingKind>().map_err(|_| invalid(kind))?;
    let color1 = color1.parse::<HexColor>().map_err(|_| invalid(color1))?;
    let color2 = color2.parse::<HexColor>().map_err(|_| invalid(color2))?;
    let blend = blend.parse::<f64>().map_err(|_| invalid(blend))?;
    let radius = radius.parse::<f64>().map_err(|_| invalid(radius))?;
    let width = width.parse::<f64>().map_err(|_| invalid(width))?;

    Ok(AppEvent::Params(
        kind,
        RingParameters::new(color1, color2, blend, radius, width),
    ))
}

fn parse_ring(rest: &str) -> Result<AppEvent, CommandError> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    let [kind, field, value] = args.as_slice() else {
        return Err(CommandError::MissingArgument("ring"));
    };
    let kind = kind
        .parse::<RingKind>()
        .map_err(|_| CommandError::InvalidArgument("ring", kind.to_string()))?;
    Ok(AppEvent::Ring(kind, RingSetting::parse(field, value)?))
}

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => write!(f, "show"),
            Self::Hide => write!(f, "hide"),
            Self::Dismiss => write!(f, "dismiss"),
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
            Self::Simulate => write!(f, "simulate"),
            Self::ConfigReload => write!(f, "reload"),
            Self::Progress(p) => write!(f, "progress {}", p),
            Self::Title(t) => write!(f, "title {}", t),
            Self::Ring(kind, setting) => write!(f, "ring {} {}", kind, setting),
            Self::Params(kind, p) => write!(
                f,
                "params {} {} {} {} {} {}",
                kind, p.color1, p.color2, p.blend, p.radius_ratio, p.width_ratio
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        let cases = vec![
            ("show", AppEvent::Show),
            ("  hide\n", AppEvent::Hide),
            ("dismiss", AppEvent::Dismiss),
            ("start", AppEvent::Start),
            ("stop", AppEvent::Stop),
            ("simulate", AppEvent::Simulate),
            ("progress 0.25", AppEvent::Progress(0.25)),
            ("title Copying files", AppEvent::Title("Copying files".to_string())),
        ];
        for (line, expected) in cases {
            assert_eq!(line.parse::<AppEvent>().unwrap(), expected);
        }
    }

    #[test]
    fn test_bad_commands() {
        assert_eq!("".parse::<AppEvent>(), Err(CommandError::Empty));
        assert!(matches!(
            "spin".parse::<AppEvent>(),
            Err(CommandError::Unknown(_))
        ));
        assert!(matches!(
            "progress lots".parse::<AppEvent>(),
            Err(CommandError::InvalidArgument("progress", _))
        ));
        assert!(matches!(
            "params activity #ffffff".parse::<AppEvent>(),
            Err(CommandError::MissingArgument("params"))
        ));
    }

    #[test]
    fn test_params_command() {
        let event: AppEvent = "params Activity #ff0000 #0000ff80 0.3 0.45 0.9"
            .parse()
            .unwrap();
        let AppEvent::Params(kind, params) = event.clone() else {
            panic!("expected params, got {:?}", event);
        };
        assert_eq!(kind, RingKind::Activity);
        assert_eq!(params.width_ratio, 0.5);
        assert_eq!(params.color2.to_string(), "#0000ff80");

        let reparsed: AppEvent = event.to_string().parse().unwrap();
        assert_eq!(reparsed, event);
    }

    #[test]
    fn test_ring_setting_command() {
        let event: AppEvent = "ring progress blend 0.25".parse().unwrap();
        assert_eq!(
            event,
            AppEvent::Ring(RingKind::Progress, RingSetting::Blend(0.25))
        );

        let event: AppEvent = "ring activity color2 #00ff00".parse().unwrap();
        let AppEvent::Ring(RingKind::Activity, RingSetting::Color2(color)) = event.clone() else {
            panic!("expected color2, got {:?}", event);
        };
        assert_eq!(color.to_string(), "#00ff00ff");
        assert_eq!(event.to_string().parse::<AppEvent>().unwrap(), event);

        assert!(matches!(
            "ring activity depth 3".parse::<AppEvent>(),
            Err(CommandError::InvalidArgument("ring", _))
        ));
        assert!(matches!(
            "ring activity radius wide".parse::<AppEvent>(),
            Err(CommandError::InvalidArgument("ring", _))
        ));
        assert!(matches!(
            "ring activity".parse::<AppEvent>(),
            Err(CommandError::MissingArgument("ring"))
        ));
    }
}
