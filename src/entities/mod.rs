mod booking;
mod location;
mod quote;
mod route;
mod vehicle;

pub use booking::{
    filter_by_status, AssignedVehicle, Booking, BookingDto, BookingStatus, DriverInfo,
    NewBooking, RouteSummary,
};
pub use location::{is_blank, Location, RouteRequest};
pub use quote::{format_money, PricingResult, PricingTable, Quote};
pub use route::{
    round_miles, round_minutes, RouteEstimate, RouteResponse, RouteStatus, SourceTag,
    METERS_PER_MILE,
};
pub use vehicle::{find_vehicle, fleet, VehicleTier};
