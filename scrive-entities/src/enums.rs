//! Enumerations used by Scrive entities.

use scrive_model::wire_enum;

wire_enum! {
    /// Lifecycle status of a document on the server.
    pub enum DocumentStatus {
        Preparation = ("preparation", "Preparation"),
        Pending = ("pending", "Pending"),
        Closed = ("closed", "Closed"),
        Canceled = ("canceled", "Canceled"),
        Timedout = ("timedout", "Timedout"),
        Rejected = ("rejected", "Rejected"),
        Error = ("error", "DocumentError"),
    }
}

wire_enum! {
    /// Document language.
    pub enum Language {
        English = ("english", "en"),
        Swedish = ("swedish", "sv"),
        German = ("german", "de"),
        French = ("french", "fr"),
        Italian = ("italian", "it"),
        Spanish = ("spanish", "es"),
        Portuguese = ("portuguese", "pt"),
        Dutch = ("dutch", "nl"),
        Danish = ("danish", "da"),
        Norwegian = ("norwegian", "no"),
        Greek = ("greek", "el"),
        Finnish = ("finnish", "fi"),
    }
}

wire_enum! {
    /// How a signatory receives the invitation to sign.
    pub enum InvitationDeliveryMethod {
        Email = ("email", "email"),
        Pad = ("pad", "pad"),
        Api = ("api", "api"),
        Mobile = ("mobile", "mobile"),
        EmailAndMobile = ("email_and_mobile", "email_mobile"),
    }
}

wire_enum! {
    /// How a signatory receives the signed document.
    pub enum ConfirmationDeliveryMethod {
        Email = ("email", "email"),
        Mobile = ("mobile", "mobile"),
        EmailAndMobile = ("email_and_mobile", "email_mobile"),
        NoDelivery = ("none", "none"),
    }
}

wire_enum! {
    pub enum AuthenticationMethod {
        Standard = ("standard", "standard"),
        Eleg = ("eleg", "eleg"),
        SmsPin = ("sms_pin", "sms_pin"),
    }
}

wire_enum! {
    pub enum FieldType {
        Standard = ("standard", "standard"),
        Custom = ("custom", "custom"),
        Signature = ("signature", "signature"),
        Checkbox = ("checkbox", "checkbox"),
    }
}

wire_enum! {
    /// Predefined signatory fields. The wire value doubles as the field name.
    pub enum StandardFieldType {
        FirstName = ("first_name", "fstname"),
        LastName = ("last_name", "sndname"),
        Email = ("email", "email"),
        Mobile = ("mobile", "mobile"),
        PersonalNumber = ("personal_number", "sigpersnr"),
        CompanyName = ("company_name", "sigco"),
        CompanyNumber = ("company_number", "sigcompnr"),
    }
}

wire_enum! {
    /// Side of a placement its tooltip points to.
    pub enum Tip {
        Left = ("left", "left"),
        Right = ("right", "right"),
    }
}
